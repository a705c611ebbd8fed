use color_eyre::eyre::eyre;
use color_eyre::Result;
use dialoguer::{Confirm, Password};

/// Prompt for an API key (masked input). Blank input is rejected.
pub fn prompt_api_key(catalog: &str, replacing: bool) -> Result<String> {
    let prompt = if replacing {
        format!("New {} API key", catalog)
    } else {
        format!("{} API key", catalog)
    };

    let key = Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| eyre!("Failed to read API key: {}", e))?;

    validate_api_key(&key).map_err(|e| eyre!("{}", e))?;
    Ok(key.trim().to_string())
}

/// Prompt for yes/no with a default
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| eyre!("Failed to read confirmation: {}", e))
}

pub fn validate_api_key(input: &str) -> Result<(), &'static str> {
    let input = input.trim();
    if input.is_empty() {
        return Err("API key cannot be empty");
    }
    if input.chars().any(char::is_whitespace) {
        return Err("API key cannot contain spaces");
    }
    Ok(())
}
