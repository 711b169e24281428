//! Static notice served at `/maintenance` while the storefront is closed.

use axum::response::Html;

const MAINTENANCE_HTML: &str = r#"<!DOCTYPE html>
<html lang="fr">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <meta name="robots" content="noindex">
  <title>Maintenance en cours | Ceramika</title>
</head>
<body>
  <main>
    <h1>Site en maintenance</h1>
    <p>Nous améliorons votre expérience. La boutique sera de nouveau disponible très bientôt.</p>
    <p>Merci de votre patience.</p>
  </main>
</body>
</html>
"#;

/// Static maintenance notice shown to blocked visitors.
pub async fn maintenance_page() -> Html<&'static str> {
    Html(MAINTENANCE_HTML)
}
