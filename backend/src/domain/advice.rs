//! Mood-matched advice and quotes.
//!
//! Fixed tables, one picked uniformly at random per request. Lookups
//! by label fall back to the generic tables for anything outside the
//! known moods, so a caller with an odd label still gets something to
//! show.

use log::debug;
use rand::Rng;

use shared::MoodType;

const HAPPY_ADVICE: &[&str] = &[
    "Keep spreading your joy to others!",
    "Try journaling about what made you happy today.",
    "Share your positive energy with someone who needs it.",
    "Build on this feeling by doing something you love.",
    "Take a moment to appreciate this feeling of happiness.",
];
const SAD_ADVICE: &[&str] = &[
    "It's okay to feel sad. Take some time for self-care.",
    "Try talking to someone you trust about your feelings.",
    "Consider a short walk in nature to clear your mind.",
    "Listen to music that resonates with how you feel right now.",
    "Remember that this feeling will pass with time.",
];
const ANGRY_ADVICE: &[&str] = &[
    "Take deep breaths and count to ten slowly.",
    "Try to identify exactly what triggered your anger.",
    "Consider writing down your thoughts to process them.",
    "Remove yourself from the situation if possible.",
    "Channel your energy into physical activity like a brisk walk.",
];
const NEUTRAL_ADVICE: &[&str] = &[
    "Use this balanced state to plan your day or week.",
    "Try mindfulness meditation to center yourself further.",
    "This is a good time for self-reflection and goal setting.",
    "Consider trying something new while you're in a steady state.",
    "Acknowledge the stability of your current mood.",
];
const EXCITED_ADVICE: &[&str] = &[
    "Channel this energy into something productive or creative!",
    "Share your excitement with others who will appreciate it.",
    "Document this feeling to revisit when you need motivation.",
    "Use this momentum to tackle something challenging.",
    "Enjoy this feeling of enthusiasm and possibility!",
];
const DEFAULT_ADVICE: &[&str] = &[
    "Take a moment to check in with yourself about how you're feeling.",
    "Consider what might have influenced your current mood.",
    "Remember that all emotions are valid and serve a purpose.",
    "Practice self-compassion, whatever you're feeling.",
    "Take care of your basic needs: rest, hydration, and nutrition.",
];

const HAPPY_QUOTES: &[&str] = &[
    "Happiness is a journey, not a destination.",
    "The best way to cheer yourself is to try to cheer someone else up.",
    "Happiness is not by chance, but by choice.",
    "Count your age by friends, not years. Count your life by smiles, not tears.",
    "The present moment is filled with joy and happiness. If you are attentive, you will see it.",
];
const SAD_QUOTES: &[&str] = &[
    "Even the darkest night will end and the sun will rise.",
    "Sadness flies away on the wings of time.",
    "The way I see it, if you want the rainbow, you gotta put up with the rain.",
    "Every adversity, every failure, every heartache carries with it the seed of an equal or greater benefit.",
    "It's okay to not be okay as long as you are not giving up.",
];
const ANGRY_QUOTES: &[&str] = &[
    "For every minute you remain angry, you give up sixty seconds of peace of mind.",
    "When angry, count to ten before you speak. If very angry, count to one hundred.",
    "Anger is an acid that can do more harm to the vessel in which it is stored than to anything on which it is poured.",
    "Speak when you are angry and you'll make the best speech you'll ever regret.",
    "The greatest remedy for anger is delay.",
];
const NEUTRAL_QUOTES: &[&str] = &[
    "Balance is not something you find, it's something you create.",
    "Life is about balance. Be kind, but don't let people abuse you. Trust, but don't be deceived. Be content, but never stop improving yourself.",
    "Calmness of mind is one of the beautiful jewels of wisdom.",
    "Sometimes you need to sit lonely on the floor in a quiet room in order to hear your own voice and not let it drown in the noise of others.",
    "In the midst of movement and chaos, keep stillness inside of you.",
];
const EXCITED_QUOTES: &[&str] = &[
    "The future belongs to those who believe in the beauty of their dreams.",
    "Do what you can, with what you have, where you are.",
    "Dream big and dare to fail.",
    "Enthusiasm moves the world.",
    "Adventure awaits, go find it!",
];
const DEFAULT_QUOTES: &[&str] = &[
    "Whatever you are feeling is valid.",
    "Your emotions are important messengers.",
    "Take each day one step at a time.",
    "You don't have to be perfect to be amazing.",
    "This too shall pass.",
];

const MOTIVATIONAL_QUOTES: &[&str] = &[
    "Your attitude determines your direction.",
    "The only limit to our realization of tomorrow is our doubts of today.",
    "Don't watch the clock; do what it does. Keep going.",
    "Believe you can and you're halfway there.",
    "You are never too old to set another goal or to dream a new dream.",
    "It always seems impossible until it's done.",
    "Start where you are. Use what you have. Do what you can.",
    "You don't have to be great to start, but you have to start to be great.",
    "The future belongs to those who believe in the beauty of their dreams.",
    "Success is not final, failure is not fatal: It is the courage to continue that counts.",
    "The only way to do great work is to love what you do.",
    "Happiness is not something ready-made. It comes from your own actions.",
    "The best time to plant a tree was 20 years ago. The second best time is now.",
    "Keep your face always toward the sunshine, and shadows will fall behind you.",
    "It's not whether you get knocked down, it's whether you get up.",
    "You are braver than you believe, stronger than you seem, and smarter than you think.",
    "The power of imagination makes us infinite.",
    "Light tomorrow with today.",
    "Every moment is a fresh beginning.",
    "Life is 10% what happens to us and 90% how we react to it.",
];

fn advice_table(mood: MoodType) -> &'static [&'static str] {
    match mood {
        MoodType::Happy => HAPPY_ADVICE,
        MoodType::Sad => SAD_ADVICE,
        MoodType::Angry => ANGRY_ADVICE,
        MoodType::Neutral => NEUTRAL_ADVICE,
        MoodType::Excited => EXCITED_ADVICE,
    }
}

fn quote_table(mood: MoodType) -> &'static [&'static str] {
    match mood {
        MoodType::Happy => HAPPY_QUOTES,
        MoodType::Sad => SAD_QUOTES,
        MoodType::Angry => ANGRY_QUOTES,
        MoodType::Neutral => NEUTRAL_QUOTES,
        MoodType::Excited => EXCITED_QUOTES,
    }
}

fn pick(options: &[&str]) -> String {
    let index = rand::rng().random_range(0..options.len());
    options[index].to_string()
}

/// Selection of advice lines and quotes for the UI to show.
#[derive(Clone)]
pub struct AdviceService;

impl AdviceService {
    pub fn new() -> Self {
        Self
    }

    /// One advice line matched to the mood.
    pub fn advice_for(&self, mood: MoodType) -> String {
        pick(advice_table(mood))
    }

    /// Advice looked up by label; unknown labels get generic advice.
    pub fn advice_for_label(&self, label: &str) -> String {
        match MoodType::from_label(label) {
            Some(mood) => self.advice_for(mood),
            None => {
                debug!("No advice table for label '{}', using generic advice", label);
                pick(DEFAULT_ADVICE)
            }
        }
    }

    /// One quote matched to the mood.
    pub fn quote_for(&self, mood: MoodType) -> String {
        pick(quote_table(mood))
    }

    /// Quote looked up by label; unknown labels get generic quotes.
    pub fn quote_for_label(&self, label: &str) -> String {
        match MoodType::from_label(label) {
            Some(mood) => self.quote_for(mood),
            None => pick(DEFAULT_QUOTES),
        }
    }

    /// One quote from the general motivational pool, independent of
    /// mood.
    pub fn random_quote(&self) -> String {
        pick(MOTIVATIONAL_QUOTES)
    }
}

impl Default for AdviceService {
    fn default() -> Self {
        Self::new()
    }
}
