//! Keyword-based mood classification for notes and voice transcripts.
//!
//! Matching is deliberately permissive: a trigger word counts when it
//! appears anywhere in the lowercased text, including inside a longer
//! word. No stemming, no tokenization. The word lists are the contract;
//! changing them changes classification results.

use log::debug;
use thiserror::Error;

use shared::{MoodType, MIN_ANALYZABLE_LEN};

/// Trigger words per mood for note analysis.
const HAPPY_WORDS: &[&str] = &[
    "happy", "joy", "delighted", "cheerful", "glad", "pleased", "overjoyed", "thrilled",
    "content", "lovely",
];
const SAD_WORDS: &[&str] = &[
    "sad", "unhappy", "depressed", "down", "blue", "gloomy", "miserable", "heartbroken",
    "disappointed", "lonely",
];
const ANGRY_WORDS: &[&str] = &[
    "angry", "mad", "furious", "irritated", "annoyed", "frustrated", "enraged", "hostile",
    "bitter", "upset",
];
const NEUTRAL_WORDS: &[&str] = &[
    "okay", "fine", "alright", "neutral", "average", "moderate", "normal", "indifferent",
    "impartial",
];
const EXCITED_WORDS: &[&str] = &[
    "excited", "enthusiastic", "eager", "energetic", "animated", "lively", "spirited",
    "thrilled", "exhilarated",
];

/// Fallback sentiment vote when no trigger word matched.
const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "love", "like", "wonderful", "amazing", "excellent",
];
const NEGATIVE_WORDS: &[&str] = &[
    "bad", "hate", "dislike", "terrible", "awful", "horrible", "worst",
];

const INTENSIFIER_WORDS: &[&str] = &["very", "extremely", "incredibly", "so", "really", "absolutely"];

/// Broader word lists for voice transcripts, which tend to ramble more
/// than typed notes.
const TRANSCRIPT_POSITIVE_WORDS: &[&str] = &[
    "happy", "joy", "excited", "good", "great", "amazing", "wonderful", "fantastic",
    "awesome", "love", "loved", "like", "liked", "delighted", "cheerful", "content",
    "ecstatic", "glad", "pleased", "thrilled",
];
const TRANSCRIPT_NEGATIVE_WORDS: &[&str] = &[
    "sad", "angry", "bad", "terrible", "awful", "frustrated", "depressed", "anxious",
    "worried", "hate", "hatred", "dislike", "miserable", "heartbroken", "upset", "fear",
    "scared", "horrible", "dreadful", "mad",
];
const TRANSCRIPT_EXCITED_WORDS: &[&str] = &[
    "excited", "thrilled", "enthusiastic", "eager", "energetic", "pumped", "animated",
    "lively", "spirited", "hyped", "exhilarated", "ecstatic",
];

/// Anger markers that tip a negative transcript from sad to angry.
/// `frustrat` is a stem so it catches frustrated and frustrating.
const ANGER_MARKERS: &[&str] = &["angry", "mad", "frustrat"];

fn trigger_words(mood: MoodType) -> &'static [&'static str] {
    match mood {
        MoodType::Happy => HAPPY_WORDS,
        MoodType::Sad => SAD_WORDS,
        MoodType::Angry => ANGRY_WORDS,
        MoodType::Neutral => NEUTRAL_WORDS,
        MoodType::Excited => EXCITED_WORDS,
    }
}

fn count_matches(lower_text: &str, words: &[&str]) -> usize {
    words.iter().filter(|word| lower_text.contains(*word)).count()
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("text too short to analyze: {length} characters after trimming, minimum is {min}", min = MIN_ANALYZABLE_LEN)]
    TextTooShort { length: usize },
}

/// The outcome of classifying one piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub mood: MoodType,
    pub intensity: f64,
}

/// Stateless classifier for notes and transcripts.
#[derive(Clone)]
pub struct ClassifierService;

impl ClassifierService {
    pub fn new() -> Self {
        Self
    }

    /// Classify a free-text journal note.
    ///
    /// Counts trigger words per mood and keeps the mood with the
    /// strictly highest count; ties keep the first mood in declaration
    /// order (happy, sad, angry, neutral, excited), except that an
    /// intensifier word shifts a tie within one valence to the higher
    /// arousal mood (excited over happy, angry over sad). With no
    /// trigger matches at all, a positive/negative word vote decides
    /// between happy, sad and neutral.
    pub fn classify(&self, text: &str) -> Result<Classification, ClassifyError> {
        let trimmed = text.trim();
        let length = trimmed.chars().count();
        if length < MIN_ANALYZABLE_LEN {
            return Err(ClassifyError::TextTooShort { length });
        }

        let lower = trimmed.to_lowercase();
        let counts = MoodType::ALL.map(|mood| count_matches(&lower, trigger_words(mood)));
        let has_intensifier = count_matches(&lower, INTENSIFIER_WORDS) > 0;

        let max_count = counts.iter().copied().max().unwrap_or(0);
        let mood = if max_count == 0 {
            let positive = count_matches(&lower, POSITIVE_WORDS);
            let negative = count_matches(&lower, NEGATIVE_WORDS);
            if positive > negative {
                MoodType::Happy
            } else if negative > positive {
                MoodType::Sad
            } else {
                MoodType::Neutral
            }
        } else {
            let count_for = |mood: MoodType| {
                MoodType::ALL
                    .iter()
                    .position(|m| *m == mood)
                    .map(|i| counts[i])
                    .unwrap_or(0)
            };
            let mut winner = MoodType::ALL
                .into_iter()
                .find(|m| count_for(*m) == max_count)
                .unwrap_or(MoodType::Neutral);
            if has_intensifier {
                // An intensified note reads as higher arousal, so a
                // tie inside one valence goes to the stronger mood.
                if winner == MoodType::Happy && count_for(MoodType::Excited) == max_count {
                    winner = MoodType::Excited;
                } else if winner == MoodType::Sad && count_for(MoodType::Angry) == max_count {
                    winner = MoodType::Angry;
                }
            }
            winner
        };

        let mut intensity = mood.base_intensity();
        if has_intensifier {
            match mood {
                MoodType::Happy | MoodType::Excited => intensity = 5.0,
                MoodType::Sad | MoodType::Angry => intensity = 1.0,
                MoodType::Neutral => {}
            }
        }

        debug!(
            "Classified note as {} (intensity {}, trigger counts {:?})",
            mood.label(),
            intensity,
            counts
        );

        Ok(Classification {
            mood,
            intensity: intensity.clamp(0.0, 5.0),
        })
    }

    /// Classify a voice transcript with a broader sentiment vote.
    ///
    /// A positive majority reads as excited when at least two excited
    /// words appear, otherwise happy. A negative majority reads as
    /// angry when an anger marker appears, otherwise sad. A draw is
    /// neutral.
    pub fn analyze_transcript(&self, text: &str) -> Result<Classification, ClassifyError> {
        let trimmed = text.trim();
        let length = trimmed.chars().count();
        if length < MIN_ANALYZABLE_LEN {
            return Err(ClassifyError::TextTooShort { length });
        }

        let lower = trimmed.to_lowercase();
        let positive = count_matches(&lower, TRANSCRIPT_POSITIVE_WORDS);
        let negative = count_matches(&lower, TRANSCRIPT_NEGATIVE_WORDS);
        let excited = count_matches(&lower, TRANSCRIPT_EXCITED_WORDS);

        let (mood, intensity) = if positive > negative {
            if excited >= 2 {
                (MoodType::Excited, 5.0)
            } else {
                (MoodType::Happy, 4.0)
            }
        } else if negative > positive {
            if ANGER_MARKERS.iter().any(|marker| lower.contains(marker)) {
                (MoodType::Angry, 1.0)
            } else {
                (MoodType::Sad, 2.0)
            }
        } else {
            (MoodType::Neutral, 3.0)
        };

        debug!(
            "Classified transcript as {} (positive {}, negative {}, excited {})",
            mood.label(),
            positive,
            negative,
            excited
        );

        Ok(Classification { mood, intensity })
    }
}

impl Default for ClassifierService {
    fn default() -> Self {
        Self::new()
    }
}
