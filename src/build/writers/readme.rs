//! Deployment README generation.

use crate::build::constants::{MANIFEST_FILE, METADATA_FILE, SERVER_ENTRY};
use crate::build::error::Result;
use crate::build::utils::fs::write_file;
use crate::metadata::PrunedDescriptor;
use handlebars::Handlebars;
use serde_json::json;
use std::path::Path;

const README_TEMPLATE: &str = r#"# {{name}} v{{version}}

Production build generated on {{build_time}} for the `{{environment}}` environment.

## Deploy

1. Copy this directory to the target host.
2. Install runtime dependencies:

   ```sh
   npm install --omit=dev
   ```

3. Start the server:

   ```sh
   NODE_ENV={{environment}} node {{server}}
   ```
{{#if engines}}
Required engines: {{engines}}
{{/if}}
## Layout

- `{{server}}` - bundled server entry
- `pages/`, `components/` - bundled client modules
- `api/` - bundled API routes
- `views/`, `fml/` - server-side templates
- `static/`, `assets/` - static files; hashed names are listed in `{{manifest}}`
- `{{metadata}}` - build time, configuration and statistics

## Cache busting

Static files under `static/` carry a content hash in their names. Resolve
public URLs through `{{manifest}}` (`assets` maps original paths to hashed
paths); hashed files can be served with a far-future cache lifetime.
"#;

/// Renders the deployment instructions for `descriptor`.
pub fn render_readme(
    descriptor: &PrunedDescriptor,
    environment: &str,
    build_time: &str,
) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);

    let engines = descriptor.engines.as_ref().map(|engines| {
        engines
            .iter()
            .map(|(engine, range)| format!("{engine} {range}"))
            .collect::<Vec<_>>()
            .join(", ")
    });

    let data = json!({
        "name": descriptor.name,
        "version": descriptor.version,
        "environment": environment,
        "build_time": build_time,
        "engines": engines,
        "server": SERVER_ENTRY,
        "manifest": MANIFEST_FILE,
        "metadata": METADATA_FILE,
    });

    Ok(handlebars.render_template(README_TEMPLATE, &data)?)
}

/// Renders and writes the README, returning the bytes written.
pub async fn write_readme(
    path: &Path,
    descriptor: &PrunedDescriptor,
    environment: &str,
    build_time: &str,
) -> Result<u64> {
    let readme = render_readme(descriptor, environment, build_time)?;
    write_file(path, readme).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::PackageDescriptor;

    #[test]
    fn readme_names_package_and_start_command() {
        let descriptor = PackageDescriptor {
            name: Some("shop".into()),
            version: Some("1.4.0".into()),
            engines: Some([("node".to_string(), ">=18".to_string())].into()),
            ..Default::default()
        }
        .prune("unused");

        let readme = render_readme(&descriptor, "production", "2024-05-01T12:00:00Z").unwrap();

        assert!(readme.starts_with("# shop v1.4.0"));
        assert!(readme.contains("NODE_ENV=production node server.js"));
        assert!(readme.contains("Required engines: node >=18"));
        assert!(readme.contains("asset-manifest.json"));
    }

    #[test]
    fn engines_line_is_omitted_when_undeclared() {
        let descriptor = PackageDescriptor::default().prune("app");
        let readme = render_readme(&descriptor, "production", "now").unwrap();
        assert!(!readme.contains("Required engines"));
    }
}
