//! Convert command: markdown in, HTML (or styled-away plain text) out

use std::path::Path;

use tokio::io::AsyncReadExt;

use crate::domain::markdown::{contains_markdown, convert};

use super::presenter::Presenter;

/// Handle convert subcommand
pub async fn handle_convert_command(
    file: Option<&Path>,
    plain: bool,
    presenter: &Presenter,
) -> Result<(), String> {
    let input = match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?,
        None => {
            let mut input = String::new();
            tokio::io::stdin()
                .read_to_string(&mut input)
                .await
                .map_err(|e| format!("Failed to read stdin: {}", e))?;
            input
        }
    };

    if !contains_markdown(&input) {
        presenter.warn("No markdown found; output is the input text");
    }
    presenter.output(&render(&input, plain));
    Ok(())
}

fn render(input: &str, plain: bool) -> String {
    let document = convert(input);
    if plain {
        document.plain_text()
    } else {
        document.to_html()
    }
}
