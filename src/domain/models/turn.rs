#[cfg(test)]
#[path = "turn_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Author;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentPiece {
    Text(String),
    #[serde(rename_all = "camelCase")]
    InlineData { mime_type: String, data: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentTag {
    pub name: String,
    pub mime_type: String,
}

/// One message in the assistant conversation. Persisted turns carry text
/// content only; an attachment survives as a `{name, mime_type}` tag for
/// display while its bytes go out with the prompt and are then dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub author: Author,
    pub pieces: Vec<ContentPiece>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<AttachmentTag>,
}

impl Turn {
    pub fn new(author: Author, text: &str) -> Turn {
        return Turn {
            author,
            pieces: vec![ContentPiece::Text(text.to_string().replace('\t', "  "))],
            attachment: None,
        };
    }

    pub fn new_with_attachment(author: Author, text: &str, attachment: AttachmentTag) -> Turn {
        let mut turn = Turn::new(author, text);
        turn.attachment = Some(attachment);
        return turn;
    }

    /// Concatenation of all text pieces in order.
    pub fn text(&self) -> String {
        return self
            .pieces
            .iter()
            .filter_map(|piece| {
                if let ContentPiece::Text(text) = piece {
                    return Some(text.as_str());
                }
                return None;
            })
            .collect::<Vec<&str>>()
            .join("");
    }

    /// Replaces the text content-piece wholesale, leaving any other pieces
    /// untouched.
    pub fn set_text(&mut self, content: &str) {
        let normalized = content.replace('\t', "  ");
        let existing = self.pieces.iter_mut().find_map(|piece| {
            if let ContentPiece::Text(text) = piece {
                return Some(text);
            }
            return None;
        });

        if let Some(text) = existing {
            *text = normalized;
        } else {
            self.pieces.push(ContentPiece::Text(normalized));
        }
    }
}
