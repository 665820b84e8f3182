use crate::output::Output;
use color_eyre::Result;
use dialoguer::{Confirm, Input};
use lenslore_models::{UserRating, MAX_USER_RATING};

/// Prompt for a string value with optional default
pub fn prompt_string(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input_builder = Input::<String>::new().with_prompt(prompt).allow_empty(true);

    if let Some(default_value) = default {
        input_builder = input_builder.default(default_value.to_string());
    }

    input_builder
        .interact_text()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read input: {}", e))
}

pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read confirmation: {}", e))
}

/// Ask for a 1-10 rating until a valid one is entered.
pub fn prompt_rating(title: &str, output: &Output) -> Result<UserRating> {
    loop {
        let answer = Input::<String>::new()
            .with_prompt(format!("Your rating for {} (1-{})", title, MAX_USER_RATING))
            .interact_text()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to read input: {}", e))?;

        match answer.parse::<UserRating>() {
            Ok(rating) => return Ok(rating),
            Err(e) => output.error(format!("Invalid rating: {}", e)),
        }
    }
}
