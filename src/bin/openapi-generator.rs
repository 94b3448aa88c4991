//! Print the HTTP API's OpenAPI document as pretty JSON.

use utoipa::OpenApi;
use wild_card_score::services::documentation::ApiDoc;

fn main() -> anyhow::Result<()> {
    let doc = ApiDoc::openapi();
    println!("{}", doc.to_pretty_json()?);
    Ok(())
}
