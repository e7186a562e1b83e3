//! Lexicon-based sentiment scoring for article text.
//!
//! [`LexiconSentimentClassifier`] is a compact valence-lexicon scorer in the
//! VADER family: each recognized token carries a valence in [-4, 4], nearby
//! booster words amplify or dampen it, a negation within the three preceding
//! tokens flips it, and the summed valence is squashed into a compound
//! polarity in [-1, 1]. The lexicon leans toward business and news
//! vocabulary since that is what the feed summaries contain.
//!
//! The classifier is a stateless value over static tables. Build it once at
//! startup and share it freely; classification never blocks and never fails,
//! except that text with no tokens at all yields no reading. An unreadable
//! article degrades to [`Sentiment::Unknown`] with no score, so one bad item
//! can never abort or skew a batch.

use crate::models::{Article, RawArticle, Sentiment};
use crate::utils::truncate_for_log;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument};

/// Compound polarity inside (-NEUTRAL_BAND, NEUTRAL_BAND) reads as neutral.
const NEUTRAL_BAND: f64 = 0.05;

/// Valence multiplier applied when a negation precedes a scored token.
const NEGATION_SCALAR: f64 = -0.74;

/// Base step a booster adds to (or a dampener removes from) a valence.
const BOOSTER_STEP: f64 = 0.293;

/// How many preceding tokens are inspected for boosters and negations.
const LOOKBACK: usize = 3;

/// Normalization constant for squashing summed valence into [-1, 1].
const NORMALIZATION_ALPHA: f64 = 15.0;

static SENTIMENT_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z]+(?:'[a-z]+)*").unwrap());

/// Token valences in [-4, 4]. General English polarity words plus the
/// business vocabulary that dominates company news feeds.
static LEXICON: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        // positive
        ("advance", 1.4),
        ("agree", 1.5),
        ("amazing", 2.8),
        ("approval", 1.8),
        ("award", 2.5),
        ("beat", 1.3),
        ("benefit", 1.9),
        ("best", 3.2),
        ("better", 1.9),
        ("bonus", 2.4),
        ("boom", 1.4),
        ("boost", 1.7),
        ("breakthrough", 2.7),
        ("bright", 1.9),
        ("brilliant", 2.8),
        ("bullish", 2.0),
        ("calm", 1.3),
        ("celebrate", 2.7),
        ("champion", 2.4),
        ("comfortable", 1.7),
        ("confident", 2.2),
        ("creative", 1.9),
        ("delight", 2.9),
        ("dividend", 1.5),
        ("eager", 1.7),
        ("earn", 1.4),
        ("ease", 1.3),
        ("easy", 1.9),
        ("effective", 1.9),
        ("efficient", 1.8),
        ("encourage", 2.0),
        ("enjoy", 2.2),
        ("excellent", 2.7),
        ("exceed", 1.6),
        ("excite", 2.4),
        ("expand", 1.3),
        ("fair", 1.7),
        ("fantastic", 2.6),
        ("favorable", 1.9),
        ("fine", 0.8),
        ("flourish", 2.2),
        ("fortune", 2.0),
        ("free", 1.8),
        ("fresh", 1.3),
        ("friendly", 2.2),
        ("gain", 1.6),
        ("generous", 2.3),
        ("glad", 2.0),
        ("good", 1.9),
        ("grand", 2.2),
        ("great", 3.1),
        ("grew", 1.4),
        ("grow", 1.4),
        ("growth", 1.6),
        ("happy", 2.7),
        ("healthy", 1.8),
        ("help", 1.7),
        ("honest", 2.3),
        ("hope", 1.9),
        ("impress", 2.1),
        ("improve", 1.9),
        ("innovative", 2.1),
        ("inspire", 2.3),
        ("keen", 1.4),
        ("love", 3.2),
        ("lucrative", 2.1),
        ("milestone", 1.8),
        ("momentum", 1.3),
        ("opportunity", 1.8),
        ("optimistic", 2.2),
        ("outperform", 2.0),
        ("partnership", 1.5),
        ("perfect", 2.7),
        ("pleased", 2.1),
        ("popular", 1.9),
        ("positive", 2.3),
        ("praise", 2.6),
        ("profit", 2.2),
        ("profitable", 2.4),
        ("progress", 1.9),
        ("promising", 2.0),
        ("prosper", 2.4),
        ("proud", 2.1),
        ("rally", 1.5),
        ("rebound", 1.4),
        ("recover", 1.5),
        ("relief", 1.9),
        ("resilient", 1.8),
        ("reward", 2.2),
        ("rise", 1.1),
        ("robust", 1.7),
        ("rose", 1.1),
        ("safe", 1.8),
        ("secure", 1.6),
        ("smart", 1.7),
        ("smooth", 1.5),
        ("soar", 1.9),
        ("solid", 1.5),
        ("stable", 1.4),
        ("strength", 1.9),
        ("strong", 2.3),
        ("succeed", 2.4),
        ("success", 2.7),
        ("successful", 2.7),
        ("support", 1.7),
        ("surge", 1.4),
        ("surpass", 1.7),
        ("thrive", 2.4),
        ("tremendous", 2.5),
        ("trust", 2.1),
        ("upbeat", 2.1),
        ("upgrade", 1.8),
        ("valuable", 2.1),
        ("vibrant", 1.9),
        ("victory", 2.8),
        ("win", 2.8),
        ("won", 2.8),
        ("wonderful", 2.7),
        ("worth", 0.9),
        // negative
        ("abandon", -1.9),
        ("accident", -1.9),
        ("accuse", -1.6),
        ("alarm", -1.4),
        ("anger", -2.2),
        ("anxious", -1.9),
        ("attack", -2.1),
        ("awful", -2.0),
        ("bad", -2.5),
        ("bankrupt", -2.6),
        ("bankruptcy", -2.6),
        ("bearish", -1.9),
        ("blame", -1.4),
        ("breach", -1.8),
        ("broke", -1.6),
        ("burden", -1.5),
        ("catastrophe", -3.4),
        ("chaos", -2.6),
        ("cheat", -2.4),
        ("collapse", -2.2),
        ("complain", -1.5),
        ("concern", -1.2),
        ("conflict", -1.7),
        ("controversy", -1.6),
        ("corrupt", -2.6),
        ("crash", -2.4),
        ("crime", -2.5),
        ("crisis", -3.1),
        ("criticize", -1.7),
        ("cut", -1.1),
        ("damage", -2.2),
        ("danger", -2.4),
        ("dead", -3.3),
        ("debt", -1.5),
        ("decline", -1.6),
        ("defeat", -2.0),
        ("deficit", -1.4),
        ("delay", -1.2),
        ("deny", -1.3),
        ("disappoint", -2.1),
        ("disaster", -3.1),
        ("dismiss", -1.4),
        ("dispute", -1.4),
        ("disrupt", -1.4),
        ("doubt", -1.5),
        ("downgrade", -1.7),
        ("drop", -1.1),
        ("fail", -2.3),
        ("failed", -2.3),
        ("failure", -2.5),
        ("fake", -2.1),
        ("fall", -1.3),
        ("fear", -2.2),
        ("fell", -1.3),
        ("fired", -1.4),
        ("flaw", -1.7),
        ("fraud", -2.8),
        ("fraudulent", -2.6),
        ("halt", -1.0),
        ("harm", -2.4),
        ("horrible", -2.5),
        ("hurt", -2.2),
        ("illegal", -2.4),
        ("lawsuit", -1.5),
        ("layoff", -2.0),
        ("lose", -2.0),
        ("loss", -1.3),
        ("losses", -1.3),
        ("lost", -1.3),
        ("low", -1.1),
        ("miss", -1.1),
        ("mistake", -1.7),
        ("negative", -1.9),
        ("panic", -2.6),
        ("penalty", -1.6),
        ("plunge", -1.9),
        ("poor", -2.1),
        ("problem", -1.7),
        ("protest", -1.3),
        ("recall", -0.9),
        ("recession", -2.2),
        ("reject", -1.7),
        ("risk", -1.1),
        ("sanction", -1.4),
        ("scandal", -2.2),
        ("scam", -2.6),
        ("shortage", -1.5),
        ("shut", -0.9),
        ("slash", -1.3),
        ("slow", -0.9),
        ("slump", -1.8),
        ("struggle", -1.7),
        ("sue", -1.7),
        ("suffer", -2.1),
        ("terrible", -2.1),
        ("threat", -1.8),
        ("tragedy", -3.1),
        ("trouble", -1.9),
        ("turmoil", -1.9),
        ("uncertain", -1.2),
        ("uncertainty", -1.3),
        ("unemployment", -1.9),
        ("unsafe", -1.9),
        ("violation", -1.8),
        ("volatile", -1.3),
        ("warn", -1.2),
        ("warning", -1.4),
        ("weak", -1.6),
        ("worry", -1.9),
        ("worst", -3.1),
        ("wrong", -2.1),
    ]
    .into_iter()
    .collect()
});

/// Intensity modifiers: positive entries amplify the following valence,
/// negative entries dampen it.
static BOOSTERS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        ("absolutely", BOOSTER_STEP),
        ("amazingly", BOOSTER_STEP),
        ("completely", BOOSTER_STEP),
        ("considerably", BOOSTER_STEP),
        ("decidedly", BOOSTER_STEP),
        ("deeply", BOOSTER_STEP),
        ("enormously", BOOSTER_STEP),
        ("entirely", BOOSTER_STEP),
        ("especially", BOOSTER_STEP),
        ("exceptionally", BOOSTER_STEP),
        ("extremely", BOOSTER_STEP),
        ("greatly", BOOSTER_STEP),
        ("highly", BOOSTER_STEP),
        ("hugely", BOOSTER_STEP),
        ("incredibly", BOOSTER_STEP),
        ("particularly", BOOSTER_STEP),
        ("really", BOOSTER_STEP),
        ("remarkably", BOOSTER_STEP),
        ("sharply", BOOSTER_STEP),
        ("significantly", BOOSTER_STEP),
        ("so", BOOSTER_STEP),
        ("substantially", BOOSTER_STEP),
        ("thoroughly", BOOSTER_STEP),
        ("totally", BOOSTER_STEP),
        ("tremendously", BOOSTER_STEP),
        ("unusually", BOOSTER_STEP),
        ("utterly", BOOSTER_STEP),
        ("very", BOOSTER_STEP),
        ("almost", -BOOSTER_STEP),
        ("less", -BOOSTER_STEP),
        ("little", -BOOSTER_STEP),
        ("marginally", -BOOSTER_STEP),
        ("occasionally", -BOOSTER_STEP),
        ("partly", -BOOSTER_STEP),
        ("slightly", -BOOSTER_STEP),
        ("somewhat", -BOOSTER_STEP),
    ]
    .into_iter()
    .collect()
});

static NEGATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "no", "not", "never", "none", "nobody", "nothing", "neither", "nor", "cannot", "can't",
        "don't", "doesn't", "didn't", "isn't", "wasn't", "aren't", "weren't", "won't", "wouldn't",
        "couldn't", "shouldn't", "hasn't", "haven't", "hadn't", "hardly", "scarcely", "barely",
        "without", "lacks", "lacking",
    ]
    .into_iter()
    .collect()
});

/// One classification result for a piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentReading {
    /// The three-way label derived from `compound`.
    pub label: Sentiment,
    /// Confidence mapped into [0, 1]: 0.5 is neutral, 1.0 fully positive.
    pub score: f64,
    /// Raw compound polarity in [-1, 1].
    pub compound: f64,
}

/// Stateless valence-lexicon classifier. See the module docs for the model.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconSentimentClassifier;

impl LexiconSentimentClassifier {
    pub fn new() -> Self {
        LexiconSentimentClassifier
    }

    /// Classify a piece of text.
    ///
    /// Returns `None` only when the text contains no word tokens at all;
    /// recognizable text with no lexicon hits is a legitimate neutral
    /// reading, not a failure.
    pub fn classify(&self, text: &str) -> Option<SentimentReading> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = SENTIMENT_TOKEN_RE
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .collect();
        if tokens.is_empty() {
            return None;
        }

        let mut total = 0.0;
        for (i, token) in tokens.iter().enumerate() {
            let Some(base) = lookup_valence(token) else {
                continue;
            };
            let mut valence = base;
            let mut negated = false;
            for distance in 1..=LOOKBACK {
                if distance > i {
                    break;
                }
                let prior = tokens[i - distance];
                if let Some(step) = BOOSTERS.get(prior) {
                    // Modifiers further away contribute a bit less.
                    let damping = match distance {
                        1 => 1.0,
                        2 => 0.95,
                        _ => 0.9,
                    };
                    valence += valence.signum() * step * damping;
                }
                if NEGATIONS.contains(prior) {
                    negated = true;
                }
            }
            if negated {
                valence *= NEGATION_SCALAR;
            }
            total += valence;
        }

        let compound = normalize(total);
        let label = if compound >= NEUTRAL_BAND {
            Sentiment::Positive
        } else if compound <= -NEUTRAL_BAND {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        };
        let score = ((compound + 1.0) / 2.0 * 1000.0).round() / 1000.0;

        Some(SentimentReading {
            label,
            score,
            compound,
        })
    }

    /// Score one raw article into the shape the aggregator consumes.
    ///
    /// The summary is the scored text; an article with a blank summary falls
    /// back to its headline. When neither yields a reading the article
    /// becomes `Unknown` with no score and stays in the batch.
    pub fn score_article(&self, raw: RawArticle) -> Article {
        let text = if raw.summary.trim().is_empty() {
            raw.title.as_str()
        } else {
            raw.summary.as_str()
        };
        let reading = self.classify(text);

        let (sentiment, sentiment_score) = match reading {
            Some(r) => (r.label, Some(r.score)),
            None => (Sentiment::Unknown, None),
        };
        debug!(
            label = %sentiment,
            score = ?sentiment_score,
            title = %truncate_for_log(&raw.title, 60),
            "Scored article"
        );

        Article {
            title: raw.title,
            summary: raw.summary,
            sentiment,
            sentiment_score,
            url: raw.url,
            publish_date: raw.publish_date,
            source: raw.source,
        }
    }

    /// Score a whole fetched batch, preserving order.
    #[instrument(level = "info", skip_all)]
    pub fn score_articles(&self, raw_articles: Vec<RawArticle>) -> Vec<Article> {
        let articles: Vec<Article> = raw_articles
            .into_iter()
            .map(|raw| self.score_article(raw))
            .collect();
        info!(count = articles.len(), "Scored article batch");
        articles
    }
}

/// Lexicon lookup with light suffix handling: exact token first, then with
/// a possessive or plural marker stripped.
fn lookup_valence(token: &str) -> Option<f64> {
    if let Some(&v) = LEXICON.get(token) {
        return Some(v);
    }
    if let Some(stem) = token.strip_suffix("'s") {
        if let Some(&v) = LEXICON.get(stem) {
            return Some(v);
        }
    }
    if let Some(stem) = token.strip_suffix('s') {
        if let Some(&v) = LEXICON.get(stem) {
            return Some(v);
        }
    }
    None
}

/// Squash a valence sum into [-1, 1].
fn normalize(total: f64) -> f64 {
    let compound = total / (total * total + NORMALIZATION_ALPHA).sqrt();
    compound.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_text() {
        let classifier = LexiconSentimentClassifier::new();
        let reading = classifier
            .classify("Excellent quarter with strong profit growth and record success")
            .unwrap();
        assert_eq!(reading.label, Sentiment::Positive);
        assert!(reading.score > 0.5);
        assert!(reading.compound > 0.0);
    }

    #[test]
    fn test_negative_text() {
        let classifier = LexiconSentimentClassifier::new();
        let reading = classifier
            .classify("Bankruptcy fears grow after fraud scandal and heavy losses")
            .unwrap();
        assert_eq!(reading.label, Sentiment::Negative);
        assert!(reading.score < 0.5);
    }

    #[test]
    fn test_factual_text_is_neutral() {
        let classifier = LexiconSentimentClassifier::new();
        let reading = classifier
            .classify("The company held its annual meeting on Tuesday")
            .unwrap();
        assert_eq!(reading.label, Sentiment::Neutral);
        assert_eq!(reading.score, 0.5);
    }

    #[test]
    fn test_negation_flips_polarity() {
        let classifier = LexiconSentimentClassifier::new();
        let plain = classifier.classify("good results").unwrap();
        let negated = classifier.classify("no good results").unwrap();
        assert_eq!(plain.label, Sentiment::Positive);
        assert_eq!(negated.label, Sentiment::Negative);
    }

    #[test]
    fn test_booster_amplifies() {
        let classifier = LexiconSentimentClassifier::new();
        let plain = classifier.classify("good").unwrap();
        let boosted = classifier.classify("very good").unwrap();
        assert!(boosted.compound > plain.compound);
    }

    #[test]
    fn test_dampener_softens_without_flipping() {
        let classifier = LexiconSentimentClassifier::new();
        let plain = classifier.classify("good").unwrap();
        let dampened = classifier.classify("slightly good").unwrap();
        assert!(dampened.compound < plain.compound);
        assert!(dampened.compound > 0.0);
    }

    #[test]
    fn test_plural_and_possessive_lookup() {
        let classifier = LexiconSentimentClassifier::new();
        assert_eq!(
            classifier.classify("profits").unwrap().label,
            Sentiment::Positive
        );
        assert_eq!(
            classifier.classify("the market's losses").unwrap().label,
            Sentiment::Negative
        );
    }

    #[test]
    fn test_wordless_text_yields_no_reading() {
        let classifier = LexiconSentimentClassifier::new();
        assert!(classifier.classify("").is_none());
        assert!(classifier.classify("   ").is_none());
        assert!(classifier.classify("123 456 !!!").is_none());
    }

    #[test]
    fn test_score_stays_in_unit_interval() {
        let classifier = LexiconSentimentClassifier::new();
        for text in [
            "best great excellent wonderful fantastic win win win",
            "worst catastrophe disaster tragedy crisis fraud",
            "plain report",
        ] {
            let reading = classifier.classify(text).unwrap();
            assert!((0.0..=1.0).contains(&reading.score));
            assert!((-1.0..=1.0).contains(&reading.compound));
        }
    }

    #[test]
    fn test_score_article_prefers_summary_over_title() {
        let classifier = LexiconSentimentClassifier::new();
        let raw = RawArticle {
            title: "Terrible crisis deepens".to_string(),
            summary: "Strong growth and excellent results".to_string(),
            url: "https://example.com".to_string(),
            publish_date: None,
            source: "Wire".to_string(),
        };
        let article = classifier.score_article(raw);
        assert_eq!(article.sentiment, Sentiment::Positive);
    }

    #[test]
    fn test_score_article_falls_back_to_title() {
        let classifier = LexiconSentimentClassifier::new();
        let raw = RawArticle {
            title: "Profits soar".to_string(),
            summary: "   ".to_string(),
            url: String::new(),
            publish_date: None,
            source: String::new(),
        };
        let article = classifier.score_article(raw);
        assert_eq!(article.sentiment, Sentiment::Positive);
        assert!(article.sentiment_score.is_some());
    }

    #[test]
    fn test_score_article_unknown_when_unreadable() {
        let classifier = LexiconSentimentClassifier::new();
        let raw = RawArticle {
            title: "!!!".to_string(),
            summary: String::new(),
            url: String::new(),
            publish_date: None,
            source: String::new(),
        };
        let article = classifier.score_article(raw);
        assert_eq!(article.sentiment, Sentiment::Unknown);
        assert_eq!(article.sentiment_score, None);
    }

    #[test]
    fn test_batch_scoring_preserves_order() {
        let classifier = LexiconSentimentClassifier::new();
        let raw = vec![
            RawArticle {
                title: "one".to_string(),
                summary: "excellent".to_string(),
                url: String::new(),
                publish_date: None,
                source: String::new(),
            },
            RawArticle {
                title: "two".to_string(),
                summary: "terrible crisis".to_string(),
                url: String::new(),
                publish_date: None,
                source: String::new(),
            },
        ];
        let articles = classifier.score_articles(raw);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "one");
        assert_eq!(articles[1].sentiment, Sentiment::Negative);
    }
}
