//! Write the OpenAPI specification to deepmail-web/docs as JSON and YAML

use std::fs;
use std::path::Path;
use deepmail_web::openapi::{get_openapi_json, get_openapi_yaml};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Generating OpenAPI specification files...");

    let docs_dir = Path::new("deepmail-web/docs");
    fs::create_dir_all(docs_dir)?;

    let json_path = docs_dir.join("openapi.json");
    fs::write(&json_path, get_openapi_json()?)?;
    println!("✅ Generated: {}", json_path.display());

    let yaml_path = docs_dir.join("openapi.yaml");
    fs::write(&yaml_path, get_openapi_yaml()?)?;
    println!("✅ Generated: {}", yaml_path.display());

    println!("📖 Interactive docs are served at http://localhost:5000/swagger-ui/");

    Ok(())
}
