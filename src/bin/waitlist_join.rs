use clap::Parser;
use tracing_subscriber::EnvFilter;
use waitlist_backend::client::{Field, HttpSignupApi, WaitlistForm};

/// Join the waitlist from the command line.
#[derive(Debug, Parser)]
#[command(name = "waitlist-join", version)]
struct Args {
    /// Base URL of the waitlist server.
    #[arg(long, env = "WAITLIST_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    name: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    let mut form = WaitlistForm::new();
    if let Some(name) = args.name {
        form.set_name(name);
    }
    form.set_email(args.email);

    if !form.can_submit() {
        let errors: Vec<&str> = [Field::Name, Field::Email]
            .into_iter()
            .filter_map(|field| form.field_error(field))
            .collect();
        anyhow::bail!(errors.join(" "));
    }

    let api = HttpSignupApi::new(&args.api_url);
    form.submit(&api).await;
    let Some(notification) = form.take_notification() else {
        anyhow::bail!("submission was not started");
    };

    if notification.is_success() {
        println!("{}", notification.message());
        Ok(())
    } else {
        anyhow::bail!(notification.message().to_string())
    }
}
