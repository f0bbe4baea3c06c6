//! HTML wrappers placed around the plain-text body.

/// Minimal wrapper used for SendGrid deliveries.
pub fn plain_html(body: &str) -> String {
    format!(r#"<div style="font-family: Arial, sans-serif;">{}</div>"#, body)
}

/// Wrapper carrying the GBA brand header, used for SMTP deliveries.
pub fn branded_html(body: &str) -> String {
    format!(
        r#"
        <div style="font-family: Arial, sans-serif; max-width: 600px;">
          <div style="background:#dc2626;color:white;padding:16px;border-radius:6px;">🚗 GBA - Notification</div>
          <div style="padding:16px;border:1px solid #eee;">{}</div>
          <div style="font-size:12px;color:#666;padding:8px;">Email automatique</div>
        </div>
      "#,
        body
    )
}
