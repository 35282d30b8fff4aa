use console::Term;
use memento::oauth::DeviceAuthorization;

use crate::config::Config;

/// Run the OAuth Device Flow sign-in and persist the resulting token.
pub(crate) async fn handle_login() -> Result<(), Box<dyn std::error::Error>> {
    let is_tty = Term::stdout().is_term();

    if is_tty {
        println!("Signing in to GitHub...\n");
    }

    let grant = DeviceAuthorization::request().await?;

    // Try to copy the code to the clipboard
    let clipboard_success = match arboard::Clipboard::new() {
        Ok(mut clipboard) => clipboard.set_text(&grant.user_code).is_ok(),
        Err(_) => false,
    };

    if is_tty {
        println!("Please visit: {}", grant.verification_uri);
        println!();
        if clipboard_success {
            println!("Your code: {} (copied to clipboard)", grant.user_code);
        } else {
            println!("Your code: {}", grant.user_code);
        }
        println!();
        println!(
            "Waiting for authorization (expires in {} seconds)...",
            grant.expires_in
        );
    } else {
        tracing::info!(
            verification_uri = %grant.verification_uri,
            user_code = %grant.user_code,
            "Please authorize the application"
        );
    }

    // Try to open the browser
    let _ = open::that(&grant.verification_uri);

    let token = grant.poll_token().await?;

    let config_path = Config::save_github_token(&token.access_token)?;

    if is_tty {
        println!();
        println!("Success! GitHub token saved to: {}", config_path.display());
        println!();
        println!("You can now browse your repositories:");
        println!("  memento repos");
        println!("  memento serve");
    } else {
        tracing::info!(
            config_path = %config_path.display(),
            "GitHub authentication successful"
        );
    }

    Ok(())
}
