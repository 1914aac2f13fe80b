//! # Position Resolver
//!
//! Chooses a string and fret for every note of a monophonic line.
//!
//! The resolver walks the notes in time order, carrying the last placed
//! position as a fold accumulator. Each note is placed where the active
//! `PositionStrategy` says the hand moves least from that position; the
//! first note, with nothing to move from, goes as low on the neck as
//! possible.
//!
//! Notes the fretboard cannot sound, and malformed notes, are skipped.
//! Skipping never resets the accumulator, so the following note is scored
//! against the last note that was actually placed.

use crate::fretboard::Fretboard;
use crate::note::{FretPosition, PitchedNote, TabPosition};

/// Scores candidate positions against the previously placed one.
///
/// Lower cost wins. Implement `cost` to try a different hand-movement
/// heuristic; the resolver's control flow stays the same.
pub trait PositionStrategy {
    /// Cost of moving from `previous` to `candidate`.
    fn cost(&self, candidate: FretPosition, previous: FretPosition) -> f32;

    /// Placement for the first playable note: lowest fret, then lowest string.
    fn opening(&self, candidates: &[FretPosition]) -> Option<FretPosition> {
        candidates
            .iter()
            .copied()
            .min_by_key(|c| (c.fret, c.string))
    }

    /// Picks one of `candidates`, which must be in enumeration order.
    ///
    /// Among equal costs the earliest candidate wins.
    fn choose(
        &self,
        candidates: &[FretPosition],
        previous: Option<FretPosition>,
    ) -> Option<FretPosition> {
        let Some(previous) = previous else {
            return self.opening(candidates);
        };
        candidates.iter().copied().min_by(|a, b| {
            self.cost(*a, previous)
                .total_cmp(&self.cost(*b, previous))
        })
    }
}

/// Weighted fret and string distance.
///
/// Sliding along the neck is weighted more heavily than crossing strings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedDistance {
    pub fret_weight: f32,
    pub string_weight: f32,
}

impl Default for WeightedDistance {
    fn default() -> Self {
        Self {
            fret_weight: 1.0,
            string_weight: 0.7,
        }
    }
}

impl PositionStrategy for WeightedDistance {
    fn cost(&self, candidate: FretPosition, previous: FretPosition) -> f32 {
        let dist_fret = candidate.fret.abs_diff(previous.fret) as f32;
        let dist_string = candidate.string.abs_diff(previous.string) as f32;
        dist_fret * self.fret_weight + dist_string * self.string_weight
    }
}

/// Chooses a position for a single pitch.
///
/// # Returns
/// * `Some(position)` - Where to play the pitch
/// * `None` - The pitch cannot be played on this fretboard
pub fn choose_position<S: PositionStrategy + ?Sized>(
    fretboard: &Fretboard,
    pitch: i32,
    previous: Option<FretPosition>,
    strategy: &S,
) -> Option<FretPosition> {
    let candidates = fretboard.candidates_for(pitch);
    strategy.choose(&candidates, previous)
}

/// Maps note sequences to tab positions for one fretboard and strategy.
#[derive(Debug, Clone)]
pub struct PositionResolver<S = WeightedDistance> {
    fretboard: Fretboard,
    strategy: S,
}

impl PositionResolver<WeightedDistance> {
    pub fn new(fretboard: Fretboard) -> Self {
        Self::with_strategy(fretboard, WeightedDistance::default())
    }
}

impl Default for PositionResolver<WeightedDistance> {
    fn default() -> Self {
        Self::new(Fretboard::default())
    }
}

/// Accumulator threaded through one resolution pass.
#[derive(Default)]
struct Pass {
    placed: Vec<TabPosition>,
    previous: Option<FretPosition>,
    skipped: usize,
}

impl<S: PositionStrategy> PositionResolver<S> {
    pub fn with_strategy(fretboard: Fretboard, strategy: S) -> Self {
        Self {
            fretboard,
            strategy,
        }
    }

    pub fn fretboard(&self) -> &Fretboard {
        &self.fretboard
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Resolves `notes` to tab positions, one per playable note.
    ///
    /// The input is stably sorted by start time first, so callers need not
    /// pre-sort. Malformed and unplayable notes are dropped. Empty input
    /// gives empty output.
    pub fn resolve(&self, notes: &[PitchedNote]) -> Vec<TabPosition> {
        let mut ordered: Vec<&PitchedNote> = notes
            .iter()
            .filter(|note| {
                let ok = note.is_well_formed();
                if !ok {
                    log::debug!("[RESOLVER] Skipping malformed note: {:?}", note);
                }
                ok
            })
            .collect();
        let malformed = notes.len() - ordered.len();
        ordered.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

        let pass = ordered.into_iter().fold(Pass::default(), |mut pass, note| {
            match choose_position(&self.fretboard, note.pitch, pass.previous, &self.strategy) {
                Some(position) => {
                    pass.placed.push(TabPosition::place(note, position));
                    pass.previous = Some(position);
                }
                None => {
                    log::debug!(
                        "[RESOLVER] Pitch {} at {:.3}s is unplayable on '{}' (ceiling {}), skipping",
                        note.pitch,
                        note.start_time,
                        self.fretboard.tuning.name,
                        self.fretboard.fret_ceiling
                    );
                    pass.skipped += 1;
                }
            }
            pass
        });

        log::debug!(
            "[RESOLVER] Placed {} of {} notes ({} malformed, {} unplayable)",
            pass.placed.len(),
            notes.len(),
            malformed,
            pass.skipped
        );
        pass.placed
    }
}

/// Resolves `notes` on a standard mandolin with the default heuristic.
pub fn notes_to_tab(notes: &[PitchedNote]) -> Vec<TabPosition> {
    PositionResolver::<WeightedDistance>::default().resolve(notes)
}

/// Total strategy cost of moving through `positions` in order.
///
/// Useful for comparing how two strategies handle the same phrase. Fewer
/// than two positions cost nothing.
pub fn phrase_cost<S: PositionStrategy + ?Sized>(positions: &[TabPosition], strategy: &S) -> f32 {
    positions
        .windows(2)
        .map(|pair| strategy.cost(pair[1].position(), pair[0].position()))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn line(pitches: &[i32]) -> Vec<PitchedNote> {
        pitches
            .iter()
            .enumerate()
            .map(|(i, &p)| PitchedNote::new(i as f64 * 0.5, i as f64 * 0.5 + 0.5, p))
            .collect()
    }

    fn positions(tabs: &[TabPosition]) -> Vec<(u8, u32)> {
        tabs.iter().map(|t| (t.string, t.fret)).collect()
    }

    /// Every candidate costs the same, so enumeration order decides.
    struct Flat;

    impl PositionStrategy for Flat {
        fn cost(&self, _candidate: FretPosition, _previous: FretPosition) -> f32 {
            0.0
        }
    }

    /// Prefers staying on the same string at any cost.
    struct StringOnly;

    impl PositionStrategy for StringOnly {
        fn cost(&self, candidate: FretPosition, previous: FretPosition) -> f32 {
            candidate.string.abs_diff(previous.string) as f32
        }
    }

    #[test]
    fn test_ascending_line_on_a_string() {
        // A4 B4 C5 D5
        let tabs = notes_to_tab(&line(&[69, 71, 72, 74]));
        assert_eq!(tabs.len(), 4);
        // A4: open A string (fret 0 beats D/7 and G/14)
        // B4 from (2,0): A/2 = 2.0, D/9 = 9.7, G/16 = 17.4
        // C5 from (2,2): A/3 = 1.0, D/10 = 8.7, G/17 = 16.4
        // D5 from (2,3): A/5 = 2.0, D/12 = 9.7, G/19 = 17.4
        assert_eq!(positions(&tabs), vec![(2, 0), (2, 2), (2, 3), (2, 5)]);
        for (tab, pitch) in tabs.iter().zip([69, 71, 72, 74]) {
            assert_eq!(tab.pitch, pitch);
        }
    }

    #[test]
    fn test_weighted_distance_cost() {
        let strategy = WeightedDistance::default();
        let cost = strategy.cost(FretPosition::new(3, 9), FretPosition::new(2, 2));
        assert!((cost - 7.7).abs() < 1e-6);
        assert_eq!(strategy.cost(FretPosition::new(2, 2), FretPosition::new(2, 2)), 0.0);
    }

    #[test]
    fn test_first_note_lowest_fret_then_lowest_string() {
        let board = Fretboard::default();
        for pitch in 55..=96 {
            let candidates = board.candidates_for(pitch);
            let chosen = choose_position(&board, pitch, None, &WeightedDistance::default()).unwrap();
            let min_fret = candidates.iter().map(|c| c.fret).min().unwrap();
            let min_string = candidates
                .iter()
                .filter(|c| c.fret == min_fret)
                .map(|c| c.string)
                .min()
                .unwrap();
            assert_eq!(chosen, FretPosition::new(min_string, min_fret), "pitch {}", pitch);
        }
    }

    #[test]
    fn test_opening_breaks_fret_ties_by_string() {
        let candidates = [FretPosition::new(3, 2), FretPosition::new(1, 2), FretPosition::new(2, 4)];
        assert_eq!(Flat.opening(&candidates), Some(FretPosition::new(1, 2)));
    }

    #[test]
    fn test_equal_costs_keep_enumeration_order() {
        // D5 = 74: E/-, A/5, D/12, G/19; all cost 0 under Flat
        let board = Fretboard::default();
        let chosen = choose_position(&board, 74, Some(FretPosition::new(4, 0)), &Flat);
        assert_eq!(chosen, Some(FretPosition::new(2, 5)));
    }

    #[test]
    fn test_strategy_is_replaceable() {
        // Start on the G string, then StringOnly keeps every note there
        let resolver = PositionResolver::with_strategy(Fretboard::default(), StringOnly);
        let tabs = resolver.resolve(&line(&[55, 62, 69, 71]));
        assert_eq!(positions(&tabs), vec![(4, 0), (4, 7), (4, 14), (4, 16)]);

        let default = notes_to_tab(&line(&[55, 62, 69, 71]));
        assert_eq!(positions(&default), vec![(4, 0), (3, 0), (2, 0), (2, 2)]);
    }

    #[test]
    fn test_empty_input() {
        assert!(notes_to_tab(&[]).is_empty());
    }

    #[test]
    fn test_unplayable_notes_dropped() {
        let tabs = notes_to_tab(&line(&[69, 40, 71, 200, 72]));
        assert_eq!(tabs.len(), 3);
        assert!(tabs.iter().all(|t| t.pitch != 40 && t.pitch != 200));
        assert_eq!(positions(&tabs), vec![(2, 0), (2, 2), (2, 3)]);
    }

    #[test]
    fn test_skip_keeps_last_placed_position() {
        // D4 G4 A4 climb the D string to fret 7. B4 is then closest on the
        // D string (fret 9), while a fresh opening would pick A/2.
        let tabs = notes_to_tab(&line(&[62, 67, 69, 20, 71]));
        assert_eq!(positions(&tabs), vec![(3, 0), (3, 5), (3, 7), (3, 9)]);

        let fresh = notes_to_tab(&line(&[71]));
        assert_eq!(positions(&fresh), vec![(2, 2)]);
    }

    #[test]
    fn test_malformed_notes_skipped() {
        let notes = vec![
            PitchedNote::new(0.0, 0.5, 69),
            PitchedNote::new(0.5, 0.5, 71),  // zero length
            PitchedNote::new(1.0, 0.8, 72),  // ends before it starts
            PitchedNote::new(1.5, 2.0, 130), // beyond MIDI range
            PitchedNote::new(2.0, 2.5, 74),
        ];
        let tabs = notes_to_tab(&notes);
        assert_eq!(positions(&tabs), vec![(2, 0), (2, 5)]);
    }

    #[test]
    fn test_unsorted_input_is_sorted_by_start() {
        let notes = vec![
            PitchedNote::new(1.5, 2.0, 74),
            PitchedNote::new(0.0, 0.5, 69),
            PitchedNote::new(1.0, 1.5, 72),
            PitchedNote::new(0.5, 1.0, 71),
        ];
        let tabs = notes_to_tab(&notes);
        assert_eq!(positions(&tabs), vec![(2, 0), (2, 2), (2, 3), (2, 5)]);
        assert!(tabs.windows(2).all(|w| w[0].start_time <= w[1].start_time));
    }

    #[test]
    fn test_equal_start_times_keep_input_order() {
        let notes = vec![
            PitchedNote::new(0.0, 0.5, 69),
            PitchedNote::new(0.0, 0.5, 62),
            PitchedNote::new(0.0, 0.5, 76),
        ];
        let pitches: Vec<i32> = notes_to_tab(&notes).iter().map(|t| t.pitch).collect();
        assert_eq!(pitches, vec![69, 62, 76]);
    }

    #[test]
    fn test_deterministic() {
        let notes = line(&[67, 69, 71, 72, 74, 76, 79, 81, 83, 84, 60, 57]);
        let resolver = PositionResolver::<WeightedDistance>::default();
        assert_eq!(resolver.resolve(&notes), resolver.resolve(&notes));
    }

    #[test]
    fn test_every_reachable_pitch_is_placed() {
        for tuning in Tuning::presets() {
            for ceiling in [0, 5, 12, 20] {
                let board = Fretboard::new(tuning.clone(), ceiling);
                let resolver = PositionResolver::new(board.clone());
                for pitch in 0..=127 {
                    let expected = !board.candidates_for(pitch).is_empty();
                    let tabs = resolver.resolve(&[PitchedNote::new(0.0, 1.0, pitch)]);
                    assert_eq!(tabs.len(), usize::from(expected));
                    for tab in tabs {
                        let open = board.tuning.open_pitch(tab.string).unwrap();
                        assert_eq!(open + tab.fret as i32, pitch);
                        assert!(tab.fret <= ceiling);
                    }
                }
            }
        }
    }

    #[test]
    fn test_phrase_cost() {
        let strategy = WeightedDistance::default();
        let tabs = notes_to_tab(&line(&[69, 71, 72, 74]));
        // 2 + 1 + 2 fret moves along one string
        assert!((phrase_cost(&tabs, &strategy) - 5.0).abs() < 1e-6);
        assert_eq!(phrase_cost(&tabs[..1], &strategy), 0.0);
        assert_eq!(phrase_cost(&[], &strategy), 0.0);
    }

    #[test]
    fn test_phrase_cost_uses_resolver_strategy() {
        let resolver = PositionResolver::with_strategy(Fretboard::default(), StringOnly);
        let tabs = resolver.resolve(&line(&[62, 69, 76]));
        // D open, then A and E crossings stay on the D string under StringOnly
        assert_eq!(positions(&tabs), vec![(3, 0), (3, 7), (3, 14)]);
        assert_eq!(phrase_cost(&tabs, resolver.strategy()), 0.0);
        assert!((phrase_cost(&tabs, &WeightedDistance::default()) - 14.0).abs() < 1e-6);
    }
}
