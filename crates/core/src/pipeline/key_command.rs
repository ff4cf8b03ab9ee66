use crate::compositing::domain::privacy_effect::PrivacyMode;

const KEY_ESCAPE: u8 = 27;

/// Action bound to a key press in interactive front ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    SetMode(PrivacyMode),
    Quit,
}

impl KeyCommand {
    /// `'0'..='3'` select a mode, ESC or `q` quit, anything else is ignored.
    pub fn from_key(key: u8) -> Option<Self> {
        match key {
            KEY_ESCAPE | b'q' => Some(KeyCommand::Quit),
            b'0'..=b'3' => PrivacyMode::from_index(key - b'0').map(KeyCommand::SetMode),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b'0', Some(KeyCommand::SetMode(PrivacyMode::None)))]
    #[case(b'1', Some(KeyCommand::SetMode(PrivacyMode::Blur)))]
    #[case(b'2', Some(KeyCommand::SetMode(PrivacyMode::Pixelate)))]
    #[case(b'3', Some(KeyCommand::SetMode(PrivacyMode::Occlude)))]
    #[case(27, Some(KeyCommand::Quit))]
    #[case(b'q', Some(KeyCommand::Quit))]
    #[case(b'Q', None)]
    #[case(b'4', None)]
    #[case(b' ', None)]
    fn test_from_key(#[case] key: u8, #[case] expected: Option<KeyCommand>) {
        assert_eq!(KeyCommand::from_key(key), expected);
    }
}
