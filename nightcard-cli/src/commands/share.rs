//! Share command - QR code pointing at the web version.

use anyhow::Result;
use nightcard_store::SettingsStore;
use qrcode::render::unicode::Dense1x2;
use qrcode::{EcLevel, QrCode};

use crate::context::text_formatter;
use crate::output::JsonFormatter;
use crate::{Cli, ExitCode, OutputFormat};

/// Renders `data` as a terminal QR code with high error correction.
pub fn render_qr(data: &str) -> Result<String> {
    let code = QrCode::with_error_correction_level(data, EcLevel::H)?;
    let rendered = code
        .render::<Dense1x2>()
        .dark_color(Dense1x2::Light)
        .light_color(Dense1x2::Dark)
        .quiet_zone(true)
        .build();
    Ok(rendered)
}

/// Runs the share command.
pub async fn run(cli: &Cli, settings: &SettingsStore) -> Result<ExitCode> {
    let settings = settings.get().await;

    match cli.format {
        OutputFormat::Text => {
            let qr = render_qr(&settings.share_url)?;
            let formatter = text_formatter(cli, &settings);
            println!("{}", formatter.format_share(&settings.share_url, &qr));
        }
        OutputFormat::Json => {
            let output = serde_json::json!({ "url": settings.share_url });
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    Ok(ExitCode::Success)
}
