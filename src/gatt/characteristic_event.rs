use crate::error::Error;

/// Outward notifications from a `CharacteristicClient`.
///
/// A failed operation still produces its `*Finished` event with an empty
/// `value`, and `error` says why.
#[derive(Debug, Clone, PartialEq)]
pub enum CharacteristicEvent {
    ValueChanged {
        value: Vec<u8>,
    },
    NotifyingChanged {
        notifying: bool,
    },
    ReadingFinished {
        value: Vec<u8>,
        error: Option<Error>,
    },
    WritingFinished {
        value: Vec<u8>,
        error: Option<Error>,
    },
    NotificationsToggled {
        enabled: bool,
        error: Option<Error>,
    },
}

impl CharacteristicEvent {
    pub fn is_failure(&self) -> bool {
        match self {
            CharacteristicEvent::ReadingFinished { error, .. }
            | CharacteristicEvent::WritingFinished { error, .. }
            | CharacteristicEvent::NotificationsToggled { error, .. } => error.is_some(),
            CharacteristicEvent::ValueChanged { .. }
            | CharacteristicEvent::NotifyingChanged { .. } => false,
        }
    }
}
