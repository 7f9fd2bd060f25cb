//! CodeSandbox define-API parameters.
//!
//! The define endpoint accepts a `parameters` value holding the sandbox files
//! as JSON, compressed with LZ-string to base64 and made URL safe.

use serde_json::{Map, Value, json};

/// Endpoint that creates a sandbox from `parameters`.
pub const SANDBOX_DEFINE_URL: &str = "https://codesandbox.io/api/v1/sandboxes/define";

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>Demo</title>
  </head>
  <body>
    <div id="root"></div>
  </body>
</html>
"#;

const REACT_ENTRY: &str = r#"import React from "react";
import { createRoot } from "react-dom/client";
import App from "./app";

createRoot(document.getElementById("root")).render(<App />);
"#;

const REACT_APP: &str = r#"import React from "react";
import Demo from "./demo";

export default function App() {
  return <Demo />;
}
"#;

/// File suffix used for a fence language.
fn language_suffix(language: &str) -> &str {
    match language {
        "javascript" => "js",
        "typescript" => "ts",
        other => other,
    }
}

fn file(content: &str) -> Value {
    json!({ "content": content, "isBinary": false })
}

/// Build the `parameters` value for a code block.
///
/// The snippet always lands in `index.<suffix>`. For `jsx` and `tsx` a small
/// React scaffold is added: `index.html`, an entry that mounts `app`, an
/// `app` that renders `demo`, the snippet itself as `demo`, and a
/// `package.json` whose `main` points at the entry.
#[must_use]
pub fn sandbox_parameters(language: &str, code: &str) -> String {
    let suffix = language_suffix(language);
    let mut files = Map::new();
    files.insert(format!("index.{suffix}"), file(code));

    if matches!(language, "jsx" | "tsx") {
        let package = json!({
            "main": format!("index.{suffix}"),
            "dependencies": {
                "react": "^18.2.0",
                "react-dom": "^18.2.0",
                "react-scripts": "^5.0.1",
            },
        });
        let package = serde_json::to_string_pretty(&package).unwrap_or_default();

        files.insert("index.html".to_owned(), file(INDEX_HTML));
        files.insert(format!("index.{suffix}"), file(REACT_ENTRY));
        files.insert(format!("app.{suffix}"), file(REACT_APP));
        files.insert(format!("demo.{suffix}"), file(code));
        files.insert("package.json".to_owned(), file(&package));
    }

    let payload = json!({ "files": files }).to_string();
    compress_url_safe(&payload)
}

/// Iframe URL for an embedded sandbox.
#[must_use]
pub fn sandbox_embed_url(parameters: &str) -> String {
    format!("{SANDBOX_DEFINE_URL}?embed=1&parameters={parameters}")
}

fn compress_url_safe(payload: &str) -> String {
    lz_str::compress_to_base64(payload)
        .replace('+', "-")
        .replace('/', "_")
        .trim_end_matches('=')
        .to_owned()
}
