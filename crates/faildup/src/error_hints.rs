use anyhow::Error;

pub(crate) fn format(err: &Error) -> String {
    let mut out = format!("Error: {err:#}");
    let hints = suggestions(err);
    if !hints.is_empty() {
        out.push_str("\n\nHints:\n");
        for hint in hints {
            out.push_str("- ");
            out.push_str(&hint);
            out.push('\n');
        }
    }
    out
}

fn suggestions(err: &Error) -> Vec<String> {
    let chain: Vec<String> = err.chain().map(|e| e.to_string()).collect();
    let haystack = chain.join(" | ").to_ascii_lowercase();
    let mut out: Vec<String> = Vec::new();

    if haystack.contains("path not found") || haystack.contains("no such file or directory") {
        push_hint(
            &mut out,
            "Verify the report directory exists and is readable.",
        );
        push_hint(
            &mut out,
            "Use an absolute path to avoid working-directory confusion.",
        );
    }

    if haystack.contains("not a directory") {
        push_hint(
            &mut out,
            "Pass the directory containing the XML reports, not a single report file.",
        );
    }

    if haystack.contains("threshold") {
        push_hint(
            &mut out,
            "Use a threshold between 0.0 and 1.0, e.g. `--threshold 0.8`.",
        );
    }

    if haystack.contains("invalid report pattern") {
        push_hint(
            &mut out,
            "Report patterns are globs such as `*.xml` or `TEST-*.xml`.",
        );
    }

    if haystack.contains("config file not found") {
        push_hint(&mut out, "Check the path given to `--config`.");
    }

    if haystack.contains("toml") && (haystack.contains("parse") || haystack.contains("invalid")) {
        push_hint(
            &mut out,
            "Check `faildup.toml` syntax and key names under the `[analyze]` table.",
        );
    }

    if haystack.contains("output file") {
        push_hint(
            &mut out,
            "Make sure the directory for `--out` exists and is writable.",
        );
    }

    out
}

fn push_hint(out: &mut Vec<String>, hint: &str) {
    if !out.iter().any(|h| h == hint) {
        out.push(hint.to_string());
    }
}
