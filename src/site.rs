//! Rendering and publication of the static dashboard artifact.

use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use tera::Tera;

use crate::reporting::domain::payload::ReportPayload;

/// Name of the template the payload is injected into.
const DASHBOARD_TEMPLATE: &str = "dashboard.html";

/// Load the dashboard templates from a directory.
pub fn load_templates(template_dir: &Path) -> anyhow::Result<Tera> {
    let glob = format!("{}/**/*.html", template_dir.display());
    let templates = Tera::new(&glob).context("Failed to load dashboard templates.")?;

    if !templates
        .get_template_names()
        .any(|name| name == DASHBOARD_TEMPLATE)
    {
        anyhow::bail!(
            "Template directory `{}` does not contain `{}`.",
            template_dir.display(),
            DASHBOARD_TEMPLATE
        );
    }

    Ok(templates)
}

/// Render the dashboard page with the report payload injected.
///
/// The payload is serialized to JSON before it reaches the template so its
/// key order survives; rendering the same payload twice produces identical
/// bytes.
pub fn render_dashboard(
    templates: &Tera,
    payload: &ReportPayload,
    as_of: NaiveDate,
) -> anyhow::Result<String> {
    let payload_json = payload
        .to_json()
        .context("Failed to serialize the report payload.")?;

    let mut context = tera::Context::new();
    context.insert("payload_json", &payload_json);
    context.insert("generated_on", &as_of.format("%Y-%m-%d").to_string());

    templates
        .render(DASHBOARD_TEMPLATE, &context)
        .context("Failed to render the dashboard template.")
}

/// Replace the published artifact with new contents.
///
/// The page is written to a temporary sibling and renamed into place, so a
/// failure part-way through a run never clobbers the previously published
/// report.
pub fn publish(output: &Path, contents: &str) -> anyhow::Result<()> {
    let temp_path = output.with_extension("html.tmp");

    fs::write(&temp_path, contents)
        .with_context(|| format!("Failed to write `{}`.", temp_path.display()))?;
    fs::rename(&temp_path, output)
        .with_context(|| format!("Failed to replace `{}`.", output.display()))?;

    Ok(())
}

#[cfg(test)]
mod test {
    use crate::reporting::domain::payload::RangeOutcome;

    use super::*;

    fn raw_templates(body: &str) -> Tera {
        let mut templates = Tera::default();
        templates
            .add_raw_template(DASHBOARD_TEMPLATE, body)
            .expect("test template should parse");
        templates
    }

    fn test_payload() -> ReportPayload {
        let mut payload = ReportPayload::new();
        payload.insert(
            "last_30",
            RangeOutcome::Unavailable {
                message: "warehouse unreachable".to_owned(),
            },
        );
        payload
    }

    #[test]
    fn rendering_injects_the_payload_verbatim() {
        let templates = raw_templates("const reportData = {{ payload_json | safe }};");
        let as_of = "2025-12-05".parse().expect("valid date");

        let page = render_dashboard(&templates, &test_payload(), as_of)
            .expect("rendering should succeed");

        assert!(page.starts_with("const reportData = {"));
        assert!(page.contains(r#""last_30""#));
        assert!(page.contains(r#""status": "unavailable""#));
    }

    #[test]
    fn rendering_exposes_the_run_date() {
        let templates = raw_templates("generated {{ generated_on }}");
        let as_of = "2025-12-05".parse().expect("valid date");

        let page = render_dashboard(&templates, &test_payload(), as_of)
            .expect("rendering should succeed");

        assert_eq!("generated 2025-12-05", page);
    }

    #[test]
    fn rendering_twice_produces_identical_bytes() {
        let templates = raw_templates("{{ payload_json | safe }}");
        let as_of = "2025-12-05".parse().expect("valid date");
        let payload = test_payload();

        let first =
            render_dashboard(&templates, &payload, as_of).expect("rendering should succeed");
        let second =
            render_dashboard(&templates, &payload, as_of).expect("rendering should succeed");

        assert_eq!(first, second);
    }

    #[test]
    fn publish_replaces_the_artifact_atomically() {
        let output = std::env::temp_dir().join(format!(
            "deposit-dashboard-publish-test-{}.html",
            std::process::id()
        ));

        publish(&output, "first run").expect("publish should succeed");
        publish(&output, "second run").expect("publish should succeed");

        let contents = fs::read_to_string(&output).expect("artifact should exist");
        assert_eq!("second run", contents);
        assert!(!output.with_extension("html.tmp").exists());

        fs::remove_file(&output).expect("cleanup should succeed");
    }
}
