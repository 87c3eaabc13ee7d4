use kuy_dashboard_backend::AuthError;

use super::Session;
use crate::cli::{GlobalOpts, LoginArgs};
use crate::error::CliError;
use crate::output::{OutputContext, OutputMode};
use crate::progress::Spinner;

/// Run the `login` command: exchange credentials for a bearer token.
///
/// The token goes to stdout so it can be captured into
/// `KUY_DASHBOARD_TOKEN` or the `[api] token` config entry.
pub async fn run(
    args: LoginArgs,
    global: &GlobalOpts,
    output: &OutputContext,
) -> Result<(), CliError> {
    let session = Session::open(global)?;

    let password = match args.password {
        Some(password) => password,
        None if output.interactive() => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(|e| CliError::Other(format!("prompt failed: {e}")))?,
        None => return Err(AuthError::MissingCredentials.into()),
    };

    let spinner = Spinner::start(output, "Masuk...");
    let signed_in = session
        .client
        .login(&args.email, &password)
        .await
        .inspect_err(|e| spinner.fail(&e.to_string()))?;
    spinner.clear();

    match output.mode {
        OutputMode::Json => output.print_json(&serde_json::json!({
            "token": signed_in.token,
            "user": signed_in.user,
        })),
        OutputMode::Plain => println!("{}", signed_in.token),
        OutputMode::Human => {
            let who = signed_in.user_name().unwrap_or(args.email.as_str());
            output.success(&format!("signed in as {who}"));
            println!("{}", signed_in.token);
        }
    }
    Ok(())
}
