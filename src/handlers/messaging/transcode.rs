//! Text conversion between IRC and the backend.

use qqirc_proto::{Ctcp, CtcpKind, FormattedStringExt};

/// Backend text for an IRC message body.
///
/// ACTION becomes `* <text>`, other CTCP requests yield `None`. NOTICE text
/// is marked with a `NOTICE: ` prefix. Formatting codes are removed, and a
/// body left empty by that yields `None`.
pub fn outbound_text(body: &str, notice: bool) -> Option<String> {
    let text = if Ctcp::is_ctcp(body) {
        let ctcp = Ctcp::parse(body)?;
        match ctcp.kind {
            CtcpKind::Action => {
                let params = ctcp.params.unwrap_or_default();
                format!("* {}", params.strip_formatting())
            }
            _ => return None,
        }
    } else {
        body.strip_formatting().into_owned()
    };

    if text.is_empty() {
        return None;
    }
    if notice {
        Some(format!("NOTICE: {text}"))
    } else {
        Some(text)
    }
}

/// Non-empty lines of a backend message, split on runs of CR/LF.
pub fn inbound_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\r', '\n']).filter(|line| !line.is_empty())
}
