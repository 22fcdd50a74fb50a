use std::error::Error;

/// Render an error and its sources, one cause per line.
pub fn error_chain(error: &(dyn Error + 'static)) -> String {
    let mut causes = anyhow::Chain::new(error).map(|cause| cause.to_string());
    let mut out = causes.next().unwrap_or_default();
    for cause in causes {
        out.push_str("\n  caused by: ");
        out.push_str(&cause);
    }
    out
}
