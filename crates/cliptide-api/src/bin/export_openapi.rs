// Print the OpenAPI document to stdout
//
// Usage: cargo run --bin export-openapi > docs/openapi.json
//
// Generates the spec without a database or a running server, so CI can
// diff the committed document against the code on every push.

use cliptide_api::openapi::ApiDoc;

fn main() {
    println!("{}", ApiDoc::to_json());
}
