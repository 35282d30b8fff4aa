use memento::theme::ThemeContext;

use crate::ThemeAction;

/// Read or change the persisted theme preference.
pub(crate) fn handle_theme(action: ThemeAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut context = ThemeContext::new()?;
    context.load()?;

    match action {
        ThemeAction::Get => {
            // load() already initialized the context, so the preference
            // is always present here.
            if let Some(preference) = context.preference() {
                println!("{preference}");
            }
        }
        ThemeAction::Set { preference } => {
            context.set(preference)?;
            println!("Theme set to {preference}");
        }
    }

    Ok(())
}
