//! Email thread helpers: thread ids, subjects, senders and body cleanup

use md5::{Digest, Md5};

const THREAD_ID_LEN: usize = 12;
const REPLY_PREFIXES: [&str; 3] = ["re:", "fwd:", "fw:"];

/// Lowercase the subject and strip every reply/forward marker
pub fn normalize_subject(subject: &str) -> String {
    let mut clean = subject.to_lowercase();
    for prefix in REPLY_PREFIXES {
        clean = clean.replace(prefix, "");
    }
    clean.trim().to_string()
}

/// Stable id for a sender + normalized subject pair
pub fn generate_thread_id(email: &str, subject: &str) -> String {
    let key = format!("{}:{}", email.to_lowercase(), normalize_subject(subject));
    let digest = format!("{:x}", Md5::digest(key.as_bytes()));
    digest[..THREAD_ID_LEN].to_string()
}

/// Subject for our reply; adds `Re: ` unless the subject already has it
pub fn reply_subject(subject: &str) -> String {
    if subject.to_lowercase().starts_with("re:") {
        subject.to_string()
    } else {
        format!("Re: {}", subject)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderAddress {
    pub email: String,
    pub name: String,
}

/// Split a `From` header value such as `"Jane Doe" <jane@acme.test>`.
///
/// Without angle brackets the whole value is the address and the local part
/// doubles as the name.
pub fn parse_sender(from: &str) -> SenderAddress {
    let from = from.trim();

    if let (Some(open), Some(close)) = (from.find('<'), from.rfind('>')) {
        if open < close {
            return SenderAddress {
                email: from[open + 1..close].trim().to_string(),
                name: from[..open].trim().trim_matches('"').to_string(),
            };
        }
    }

    SenderAddress {
        email: from.to_string(),
        name: from.split('@').next().unwrap_or_default().to_string(),
    }
}

/// Drop quoted replies and signatures so only the new text remains
pub fn clean_email_body(body: &str) -> String {
    let mut kept = Vec::new();

    for line in body.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with('>') {
            continue;
        }
        if line.contains("On ") && line.contains(" wrote:") {
            break;
        }
        if trimmed.starts_with("From:") && line.contains('@') {
            break;
        }
        if line.contains("-------- Original Message --------") {
            break;
        }
        if trimmed == "--" {
            break;
        }

        kept.push(line);
    }

    kept.join("\n").trim().to_string()
}
