use serde::Serialize;

/// Alert text addressed to a single Messenger recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    pub recipient_id: String,
    pub text: String,
}

/// Body of a Messenger Send API call.
#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub messaging_type: &'static str,
    pub recipient: Recipient<'a>,
    pub message: MessageBody<'a>,
}

#[derive(Debug, Serialize)]
pub struct Recipient<'a> {
    pub id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct MessageBody<'a> {
    pub text: &'a str,
}

impl<'a> From<&'a OutboundMessage> for SendMessageRequest<'a> {
    fn from(message: &'a OutboundMessage) -> Self {
        Self {
            messaging_type: "RESPONSE",
            recipient: Recipient {
                id: &message.recipient_id,
            },
            message: MessageBody {
                text: &message.text,
            },
        }
    }
}
