//! Script emission for machines where direct downloads get blocked.
//!
//! The bash script mirrors the fetch loop: skip files that exist, same headers,
//! same fixed delay between requests. The JS script is pasted into the browser
//! console on the wiki itself, where the hotlink check passes.

use crate::configuration::Settings;
use crate::models::{DownloadItem, RemoteLocator, ScriptFormat};
use crate::source::{collect_items, Source};
use crate::wiki::{http_client, WikiClient};
use log::{info, warn};
use serde_json::Value;
use std::fmt::Write as _;
use std::path::Path;
use tokio::fs;
use url::Url;

const JS_LOOP: &str = r#"
async function downloadPerks() {
    console.log(`Downloading ${perks.length} perks...`);

    for (let i = 0; i < perks.length; i++) {
        const perk = perks[i];
        console.log(`[${i + 1}/${perks.length}] ${perk.name}`);

        try {
            const response = await fetch(perk.url);
            if (!response.ok) {
                throw new Error(`HTTP ${response.status}`);
            }
            const blob = await response.blob();

            const url = window.URL.createObjectURL(blob);
            const a = document.createElement('a');
            a.href = url;
            a.download = perk.name;
            document.body.appendChild(a);
            a.click();
            window.URL.revokeObjectURL(url);
            document.body.removeChild(a);
        } catch (error) {
            console.error(`Failed ${perk.name}:`, error);
        }

        if (i + 1 < perks.length) {
            await new Promise(resolve => setTimeout(resolve, DELAY_MS));
        }
    }

    console.log('Done');
}

downloadPerks();
"#;

fn direct_items(items: &[DownloadItem]) -> Vec<(&DownloadItem, &Url)> {
    items
        .iter()
        .filter_map(|item| match &item.remote {
            RemoteLocator::Url(url) => Some((item, url)),
            RemoteLocator::WikiFile(_) => None,
        })
        .collect()
}

pub fn render_script(items: &[DownloadItem], settings: &Settings) -> String {
    let delay = settings.inter_item_delay().as_secs_f64();
    let direct = direct_items(items);

    let mut script = String::new();
    script.push_str("#!/bin/bash\n");
    let _ = writeln!(script, "# Downloads {} perk images", direct.len());
    let _ = writeln!(script, "mkdir -p {}", quote(&settings.output_directory));
    let _ = writeln!(script, "cd {} || exit 1\n", quote(&settings.output_directory));

    for (idx, (item, url)) in direct.iter().enumerate() {
        let name = quote(&item.local_name);
        let _ = writeln!(
            script,
            "[ -e {name} ] || curl -fL -A {ua} -e {referer} -o {name} {url}",
            name = name,
            ua = quote(&settings.user_agent),
            referer = quote(&settings.referer),
            url = quote(url.as_str()),
        );
        if delay > 0.0 && idx + 1 < direct.len() {
            let _ = writeln!(script, "sleep {}", delay);
        }
    }

    script.push_str("\necho \"Done\"\n");
    script
}

/// Browser console downloader. Files land in the browser's download folder.
pub fn render_js(items: &[DownloadItem], settings: &Settings) -> String {
    let direct = direct_items(items);

    let mut script = String::new();
    let _ = writeln!(script, "// Perk downloader: paste into the browser console on");
    let _ = writeln!(script, "// {}", settings.wiki.category_url());
    let _ = writeln!(script, "const DELAY_MS = {};", settings.inter_item_delay_ms);
    script.push_str("\nconst perks = [\n");
    for (item, url) in &direct {
        let _ = writeln!(
            script,
            "    {{url: {}, name: {}}},",
            Value::from(url.as_str()),
            Value::from(item.local_name.as_str())
        );
    }
    script.push_str("];\n");
    script.push_str(JS_LOOP);
    script
}

/// Single-quotes `s` for bash.
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Collects items from `source` and writes them as a download script to `path`.
pub async fn emit(
    settings: &Settings,
    source: Source,
    path: &Path,
    format: ScriptFormat,
) -> anyhow::Result<usize> {
    let wiki = WikiClient::new(http_client(settings)?, settings.wiki.api_url());
    let listing = collect_items(source, &wiki, settings).await;
    let items = listing.items;

    let lookups = items
        .iter()
        .filter(|item| matches!(item.remote, RemoteLocator::WikiFile(_)))
        .count();
    if lookups > 0 {
        warn!(
            "{} items need an api lookup and are left out of the script; use --source static or dom",
            lookups
        );
    }

    match format {
        ScriptFormat::Bash => {
            fs::write(path, render_script(&items, settings)).await?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).await?;
            }
        }
        ScriptFormat::Js => fs::write(path, render_js(&items, settings)).await?,
    }

    let written = items.len() - lookups;
    info!(
        "Wrote {} downloads from {} to {}",
        written,
        listing.origin,
        path.display()
    );
    Ok(written)
}
