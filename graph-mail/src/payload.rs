//! Message payload construction.
//!
//! [`build_payload`] is the pure transformation from a [`Message`] into the
//! JSON shape the `sendMail` endpoint expects. It performs no I/O and no
//! validation; whatever the caller put in the model is mapped faithfully.
//!
//! Sparse output invariant: optional keys are omitted entirely rather than
//! serialized as empty arrays, empty strings, or nulls. The one deliberate
//! exception is the recipient display name, which the API shape carries as
//! an explicit `null` when absent.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;

use crate::message::{Address, Attachment, Message};

/// Message importance as the API spells it.
///
/// Derived from the model's numeric priority: 3 maps to `Normal`, anything
/// below to `Low`, anything above to `High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Importance {
    Low,
    Normal,
    High,
}

impl Importance {
    fn from_priority(priority: u8) -> Self {
        match priority {
            3 => Importance::Normal,
            p if p < 3 => Importance::Low,
            _ => Importance::High,
        }
    }
}

/// `{"emailAddress": {"name": …, "address": …}}` recipient wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub email_address: EmailAddress,
}

/// The address record inside a recipient. `name` is serialized as `null`
/// when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailAddress {
    pub name: Option<String>,
    pub address: String,
}

impl From<&Address> for Recipient {
    fn from(address: &Address) -> Self {
        Recipient {
            email_address: EmailAddress {
                name: address.name.clone(),
                address: address.email.clone(),
            },
        }
    }
}

/// `{"contentType": "html"|"text", "content": …}` body record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBody {
    pub content_type: &'static str,
    pub content: String,
}

/// A file attachment in the API's `fileAttachment` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAttachment {
    #[serde(rename = "@odata.type")]
    pub odata_type: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
    pub content_type: String,
    pub content_bytes: String,
    pub size: usize,
    pub is_inline: bool,
}

impl From<&Attachment> for FileAttachment {
    fn from(attachment: &Attachment) -> Self {
        FileAttachment {
            odata_type: "#microsoft.graph.fileAttachment",
            name: attachment.filename.clone(),
            content_id: attachment.content_id.clone(),
            content_type: attachment.content_type.clone(),
            content_bytes: BASE64.encode(&attachment.content),
            size: attachment.content.len(),
            is_inline: attachment.inline,
        }
    }
}

/// The message object posted to the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<Recipient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Recipient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<Vec<Recipient>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_recipients: Option<Vec<Recipient>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc_recipients: Option<Vec<Recipient>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bcc_recipients: Option<Vec<Recipient>>,
    pub importance: Importance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<MessageBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<FileAttachment>>,
}

fn recipients(addresses: &[Address]) -> Option<Vec<Recipient>> {
    if addresses.is_empty() {
        None
    } else {
        Some(addresses.iter().map(Recipient::from).collect())
    }
}

fn body_of(message: &Message) -> Option<MessageBody> {
    // HTML wins when both bodies are present.
    if let Some(html) = &message.html_body {
        return Some(MessageBody {
            content_type: "html",
            content: html.clone(),
        });
    }
    message.text_body.as_ref().map(|text| MessageBody {
        content_type: "text",
        content: text.clone(),
    })
}

/// Build the API payload for a message.
pub fn build_payload(message: &Message) -> MailPayload {
    let sender = message.from.as_ref().map(Recipient::from);

    MailPayload {
        subject: if message.subject.is_empty() {
            None
        } else {
            Some(message.subject.clone())
        },
        sender: sender.clone(),
        from: sender,
        reply_to: recipients(&message.reply_to),
        to_recipients: recipients(&message.to),
        cc_recipients: recipients(&message.cc),
        bcc_recipients: recipients(&message.bcc),
        importance: Importance::from_priority(message.priority),
        body: body_of(message),
        attachments: if message.attachments.is_empty() {
            None
        } else {
            Some(message.attachments.iter().map(FileAttachment::from).collect())
        },
    }
}
