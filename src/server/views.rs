// Presentation views

//! # Presentation Views
//!
//! Two pages, each showing one random number:
//!
//! - [`index_page`] (`/`): static markup with an empty placeholder. A script in
//!   the page fetches `/api/randomNumber` from the browser and fills it in. The
//!   server never touches the backend for this page.
//! - [`gssp_page`] (`/gssp`): rendered on the server. It waits for the
//!   application host, calls [`AppController::random_number`] directly (no HTTP
//!   round-trip) and embeds the result in the initial HTML.
//!
//! [`AppController::random_number`]: crate::backend::AppController::random_number

use axum::{extract::State, response::Html};

use super::routes::OuterState;
use crate::Result;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>Random Number</title>
  </head>
  <body>
    <div>Random Number: <span id="random-number"></span></div>
    <script>
      fetch('/api/randomNumber')
        .then(response => response.text())
        .then(text => {
          document.getElementById('random-number').textContent = String(+text);
        });
    </script>
  </body>
</html>
"#;

/// Placeholder markup; the number is filled in client-side
pub async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Server-rendered number from the backend's controller
///
/// Waits for the application host like any bridged request would.
pub async fn gssp_page(State(state): State<OuterState>) -> Result<Html<String>> {
    let backend = state.host.get_app().await?;
    let random_number = backend.controller().random_number();
    Ok(Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n  <body>\n    <p>Random Number: {}</p>\n  </body>\n</html>\n",
        random_number
    )))
}
