//! Last-resort classification through the system `file` utility.

use super::{OCTET_STREAM, Resource};
use std::borrow::Cow;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::LazyLock;

static FILE_UTILITY: LazyLock<Option<PathBuf>> = LazyLock::new(|| match which::which("file") {
    Ok(path) => Some(path),
    Err(_) => {
        tracing::info!("`file` utility not found in PATH; system media type detection disabled");
        None
    },
});

pub(super) fn sniff(resource: &Resource<'_>) -> Option<Cow<'static, str>> {
    let file = FILE_UTILITY.as_ref()?;
    let mut child = Command::new(file)
        .args(["--brief", "--mime-type", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .inspect_err(|e| tracing::debug!(error = %e, "Could not run `file`"))
        .ok()?;
    if let Some(mut stdin) = child.stdin.take() {
        // `file` stops reading once it has seen enough, which closes the pipe
        // early; a broken pipe here is expected.
        let _ = stdin.write_all(resource.data);
    }
    let output = child.wait_with_output().ok()?;
    if !output.status.success() {
        return None;
    }
    parse(&String::from_utf8_lossy(&output.stdout)).map(|mime| Cow::Owned(mime.to_string()))
}

/// Accepts `type/subtype` answers that actually say something about the content.
fn parse(output: &str) -> Option<&str> {
    let mime = output.trim();
    let (kind, subtype) = mime.split_once('/')?;
    if kind.is_empty() || subtype.is_empty() || mime.contains(char::is_whitespace) {
        return None;
    }
    match mime {
        OCTET_STREAM | "application/x-empty" => None,
        _ if kind == "inode" => None,
        _ => Some(mime),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("image/png\n", Some("image/png"))]
    #[case("font/woff2\n", Some("font/woff2"))]
    #[case("application/octet-stream\n", None)]
    #[case("application/x-empty\n", None)]
    #[case("inode/x-empty\n", None)]
    #[case("cannot open `-' (No such file or directory)\n", None)]
    #[case("", None)]
    fn test_parse(#[case] output: &str, #[case] expected: Option<&str>) {
        assert_eq!(parse(output), expected);
    }
}
