//! Starter files for a brand new project.

use crate::domain::files::{DEFAULT_ENTRY_PATH, INDEX_ENTRY_PATH};
use crate::domain::{FileCollection, FileRecord};

const STYLES_CSS: &str = r#"body {
  font-family: sans-serif;
  -webkit-font-smoothing: auto;
  -moz-osx-font-smoothing: grayscale;
  text-rendering: optimizeLegibility;
}
h1 {
  font-size: 1.5rem;
  color: #2c3e50;
}
"#;

const APP_JS: &str = r#"import "./styles.css";

export default function App() {
  return <h1>Hello CipherStudio!</h1>;
}
"#;

const INDEX_JS: &str = r#"import React from "react";
import { createRoot } from "react-dom/client";
import App from "./App.js";

const root = createRoot(document.getElementById("root"));
root.render(
  <React.StrictMode>
    <App />
  </React.StrictMode>
);
"#;

/// React starter: stylesheet, App component and the hidden bootstrap file
pub fn starter_files() -> FileCollection {
    FileCollection::from([
        ("/src/styles.css".to_string(), FileRecord::new(STYLES_CSS)),
        (DEFAULT_ENTRY_PATH.to_string(), FileRecord::new(APP_JS)),
        (INDEX_ENTRY_PATH.to_string(), FileRecord::hidden(INDEX_JS)),
    ])
}

/// Content given to a file created from the toolbar
pub fn new_file_content(path: &str) -> String {
    format!("// New file: {path}\n")
}
