//! Click sound cues.
//!
//! Selection is pure: callers pass the random source. Playback is a thin
//! browser adapter that ignores every failure (autoplay blocks included).

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Croak,
    Squeak,
    Croakfest,
    Moan,
    Crazy,
    Party,
    Laugh,
    Crit,
}

impl Cue {
    pub fn asset(self) -> &'static str {
        match self {
            Cue::Croak => "sfx/single-croak.mp3",
            Cue::Squeak => "sfx/squeak.mp3",
            Cue::Croakfest => "sfx/croakfest.mp3",
            Cue::Moan => "sfx/frog-moan.mp3",
            Cue::Crazy => "sfx/crazy-frog.mp3",
            Cue::Party => "sfx/party-frogs.mp3",
            Cue::Laugh => "sfx/hahaha-frog.mp3",
            Cue::Crit => "sfx/crit.mp3",
        }
    }

    pub fn volume(self) -> f64 {
        match self {
            Cue::Croak => 0.7,
            Cue::Squeak | Cue::Crit => 0.9,
            Cue::Croakfest | Cue::Moan => 0.8,
            Cue::Crazy | Cue::Party | Cue::Laugh => 0.85,
        }
    }
}

/// Clicks after which the second tier of rare cues can play.
pub const TIER_TWO_CLICKS: u64 = 500;
/// Clicks after which the third tier can play.
pub const TIER_THREE_CLICKS: u64 = 2_000;

/// Pick from a tier: `first` with probability `p1`, otherwise `second` with `p2`.
fn tier(roll: &mut impl FnMut() -> f64, first: (Cue, f64), second: (Cue, f64)) -> Option<Cue> {
    if roll() < first.1 {
        Some(first.0)
    } else if roll() < second.1 {
        Some(second.0)
    } else {
        None
    }
}

/// Cues for one click. The croak always plays; each unlocked tier may add one.
pub fn click_cues(total_clicks: u64, mut roll: impl FnMut() -> f64) -> Vec<Cue> {
    let mut cues = vec![Cue::Croak];
    cues.extend(tier(&mut roll, (Cue::Squeak, 0.04), (Cue::Croakfest, 0.02)));
    if total_clicks > TIER_TWO_CLICKS {
        cues.extend(tier(&mut roll, (Cue::Moan, 0.015), (Cue::Crazy, 0.008)));
    }
    if total_clicks > TIER_THREE_CLICKS {
        cues.extend(tier(&mut roll, (Cue::Party, 0.006), (Cue::Laugh, 0.004)));
    }
    cues
}

#[cfg(target_arch = "wasm32")]
pub fn play(cue: Cue) {
    if let Ok(audio) = web_sys::HtmlAudioElement::new_with_src(cue.asset()) {
        audio.set_volume(cue.volume());
        let _ = audio.play();
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn play(_cue: Cue) {}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays the given rolls, then 1.0 (never hits) forever.
    fn rolls(values: &[f64]) -> impl FnMut() -> f64 + '_ {
        let mut it = values.iter();
        move || it.next().copied().unwrap_or(1.0)
    }

    #[test]
    fn croak_always_plays() {
        assert_eq!(click_cues(0, rolls(&[])), [Cue::Croak]);
    }

    #[test]
    fn first_tier_prefers_squeak() {
        assert_eq!(click_cues(0, rolls(&[0.01])), [Cue::Croak, Cue::Squeak]);
        // squeak missed, croakfest hit
        assert_eq!(click_cues(0, rolls(&[0.5, 0.01])), [Cue::Croak, Cue::Croakfest]);
        assert_eq!(click_cues(0, rolls(&[0.5, 0.5])), [Cue::Croak]);
    }

    #[test]
    fn higher_tiers_need_clicks() {
        let always = || 0.0;
        assert_eq!(click_cues(500, always), [Cue::Croak, Cue::Squeak]);
        assert_eq!(click_cues(501, always), [Cue::Croak, Cue::Squeak, Cue::Moan]);
        assert_eq!(
            click_cues(2_001, always),
            [Cue::Croak, Cue::Squeak, Cue::Moan, Cue::Party]
        );
    }

    #[test]
    fn second_choice_in_upper_tiers() {
        // tier 1 miss/miss, tier 2 miss/hit, tier 3 miss/hit
        let cues = click_cues(5_000, rolls(&[0.9, 0.9, 0.9, 0.005, 0.9, 0.003]));
        assert_eq!(cues, [Cue::Croak, Cue::Crazy, Cue::Laugh]);
    }

    #[test]
    fn every_cue_has_an_asset() {
        for cue in [
            Cue::Croak,
            Cue::Squeak,
            Cue::Croakfest,
            Cue::Moan,
            Cue::Crazy,
            Cue::Party,
            Cue::Laugh,
            Cue::Crit,
        ] {
            assert!(cue.asset().ends_with(".mp3"));
            assert!(cue.volume() > 0.0 && cue.volume() <= 1.0);
        }
    }
}
