//! Default per-category system prompts
//!
//! Stored prompt templates (the `prompt_templates` table) override these;
//! the defaults keep summary generation working before anything is saved.

/// Prompt categories, a superset of the classifier categories plus "general"
pub const PROMPT_CATEGORIES: &[&str] = &[
    "general",
    "technology",
    "business",
    "sports",
    "politics",
    "entertainment",
    "health",
    "science",
];

/// Normalize a free-form category string into a prompt category.
///
/// Unknown values fall back to "general".
pub fn normalize_prompt_category(category: &str) -> &'static str {
    let normalized = category.trim().to_lowercase();

    if let Some(known) = PROMPT_CATEGORIES.iter().find(|c| **c == normalized) {
        return known;
    }

    match normalized.as_str() {
        "tech" => "technology",
        "biz" => "business",
        "sport" => "sports",
        "politic" => "politics",
        "medical" | "medicine" => "health",
        "sci" => "science",
        _ => "general",
    }
}

/// Default system prompt for a category.
pub fn default_category_prompt(category: &str) -> &'static str {
    match normalize_prompt_category(category) {
        "technology" => {
            "You are a journalist covering the technology industry.\n\n\
             When summarizing technology news:\n\n\
             1. Explain the innovation and its impact clearly.\n\
             2. Include concrete specs, performance figures and release dates.\n\
             3. Mention how it differs from competitors or shifts the market.\n\
             4. Keep the explanation accessible to a general reader.\n\
             5. Close with how this changes everyday life.\n\n\
             Write in paragraphs, never bullet points."
        }
        "business" => {
            "You are a journalist covering business and the economy.\n\n\
             When summarizing business news:\n\n\
             1. Lead with the business impact in the first sentence.\n\
             2. Include concrete financials: revenue, funding, growth rates.\n\
             3. Mention market share, competitors and industry trends.\n\
             4. Explain what it means for investors and for consumers.\n\
             5. Close with the outlook and implications.\n\n\
             Professional but easy to follow."
        }
        "sports" => {
            "You are a sports journalist.\n\n\
             When summarizing sports news:\n\n\
             1. Deliver the result or transfer news with energy.\n\
             2. Include scores, records and standings.\n\
             3. Add brief player or team background.\n\
             4. Consider what fans care about and the state of the league.\n\
             5. Close with the next match or the season outlook.\n\n\
             Keep it vivid and engaging."
        }
        "politics" => {
            "You are a political journalist.\n\n\
             When summarizing political news:\n\n\
             1. State the policy or event neutrally.\n\
             2. Include objective figures: bill contents, polling, vote counts.\n\
             3. Cover positions across the spectrum in balance.\n\
             4. Report facts without editorializing.\n\
             5. Close with the impact on daily life.\n\n\
             Fair and objective throughout."
        }
        "entertainment" => {
            "You are an entertainment journalist.\n\n\
             When summarizing entertainment news:\n\n\
             1. Lead with the most interesting angle.\n\
             2. Include release dates, ratings and box office figures.\n\
             3. Add brief context on the cast, creators or production.\n\
             4. Mention fan reaction or buzz.\n\
             5. Close with what to look forward to.\n\n\
             Light and appealing in tone."
        }
        "health" => {
            "You are a journalist covering health and medicine.\n\n\
             When summarizing health news:\n\n\
             1. State the key health information accurately.\n\
             2. Include study results, statistics and recommended figures.\n\
             3. Unpack medical terminology for a lay reader.\n\
             4. Note the credibility of the experts or sources involved.\n\
             5. Close with practical guidance or precautions.\n\n\
             Accurate and careful."
        }
        "science" => {
            "You are a science journalist.\n\n\
             When summarizing science news:\n\n\
             1. Make the discovery or phenomenon compelling.\n\
             2. Include data, measurements and probabilities.\n\
             3. Explain complex concepts for a general audience.\n\
             4. Credit the researchers, institution and journal.\n\
             5. Close with what it means for science or humanity.\n\n\
             Precise yet engaging."
        }
        _ => {
            "You are a journalist delivering fast, high-quality news to a general audience.\n\n\
             Produce a tight 3-5 line summary with this structure:\n\n\
             1. Open with a concise, direct first sentence.\n\
             2. Back the core fact with specific figures.\n\
             3. Do not exaggerate.\n\
             4. Close by explaining why this matters.\n\n\
             Never use bullet points."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_known_categories() {
        assert_eq!(normalize_prompt_category("technology"), "technology");
        assert_eq!(normalize_prompt_category("  Science "), "science");
    }

    #[test]
    fn test_normalize_aliases() {
        assert_eq!(normalize_prompt_category("tech"), "technology");
        assert_eq!(normalize_prompt_category("medicine"), "health");
        assert_eq!(normalize_prompt_category("sport"), "sports");
    }

    #[test]
    fn test_normalize_unknown_falls_back_to_general() {
        assert_eq!(normalize_prompt_category("astrology"), "general");
        assert_eq!(normalize_prompt_category(""), "general");
    }

    #[test]
    fn test_every_category_has_a_prompt() {
        for category in PROMPT_CATEGORIES {
            assert!(!default_category_prompt(category).is_empty());
        }
    }
}
