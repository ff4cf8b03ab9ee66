use crate::shared::frame::FrameView;
use crate::shared::rect::Rect;

use super::privacy_effect::PrivacyEffect;

/// Domain interface for applying one privacy effect to one face region.
///
/// Implementations mutate `frame` in place and never write outside the
/// clamped `rect`. Degenerate geometry and out-of-range parameters are
/// absorbed rather than reported, so there is no error path.
pub trait FrameCompositor: Send {
    fn apply(&self, frame: &mut FrameView<'_>, rect: Rect, effect: &PrivacyEffect<'_>);
}
