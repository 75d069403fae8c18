//! # Colour Frequency
//!
//! Downloads a page and counts its `#RGB` / `#RRGGBB` literals. Used to
//! pick the reader palette from a reference site.

use std::collections::HashMap;
use std::sync::LazyLock;

use log::info;
use regex::Regex;

use super::ToolError;

pub const DEFAULT_URL: &str = "https://thequietus.com/reviews/";
pub const TOP_N: usize = 20;

const USER_AGENT: &str = "Mozilla/5.0";

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[A-Fa-f0-9]{3,6}").expect("valid colour regex"));

/// Colour counts, most frequent first. Colours are uppercased before
/// counting; ties keep alphabetical order.
pub fn count_colors(html: &str) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for m in HEX_COLOR.find_iter(html) {
        *counts.entry(m.as_str().to_uppercase()).or_default() += 1;
    }
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

pub async fn fetch_page(url: &str) -> Result<String, ToolError> {
    let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ToolError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response.text().await?)
}

/// `psalter colors`: the top colours of a page as `COLOR: count` lines.
pub async fn run(url: &str, top: usize) -> Result<Vec<String>, ToolError> {
    info!("Fetching {}", url);
    let html = fetch_page(url).await?;
    let ranked = count_colors(&html);
    info!("{} distinct colours", ranked.len());
    Ok(ranked
        .into_iter()
        .take(top)
        .map(|(color, count)| format!("{color}: {count}"))
        .collect())
}
