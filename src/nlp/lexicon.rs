// src/nlp/lexicon.rs
//! Fixed word lists used by the rule recognizer.

use once_cell::sync::Lazy;
use std::collections::HashSet;

// English stop words (the common closed-class list used by most NLP toolkits)
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "amount",
    "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "both", "bottom", "but", "by", "ca", "call", "can", "cannot", "could", "did", "do",
    "does", "doing", "done", "down", "due", "during", "each", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "first", "five", "for", "former",
    "formerly", "forty", "four", "from", "front", "full", "further", "get", "give", "go", "had",
    "has", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein", "hereupon",
    "hers", "herself", "him", "himself", "his", "how", "however", "hundred", "i", "if", "in",
    "indeed", "into", "is", "it", "its", "itself", "just", "keep", "last", "latter", "latterly",
    "least", "less", "made", "make", "many", "may", "me", "meanwhile", "might", "mine", "more",
    "moreover", "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely",
    "neither", "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor",
    "not", "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "part",
    "per", "perhaps", "please", "put", "quite", "rather", "re", "really", "regarding", "same",
    "say", "see", "seem", "seemed", "seeming", "seems", "serious", "several", "she", "should",
    "show", "side", "since", "six", "sixty", "so", "some", "somehow", "someone", "something",
    "sometime", "sometimes", "somewhere", "still", "such", "take", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby", "therefore",
    "therein", "thereupon", "these", "they", "third", "this", "those", "though", "three",
    "through", "throughout", "thru", "thus", "to", "together", "too", "top", "toward", "towards",
    "twelve", "twenty", "two", "under", "unless", "until", "up", "upon", "us", "used", "using",
    "various", "very", "via", "was", "we", "well", "were", "what", "whatever", "when", "whence",
    "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever",
    "whether", "which", "while", "whither", "who", "whoever", "whole", "whom", "whose", "why",
    "will", "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves", "'d", "'ll", "'m", "'re", "'s", "'ve", "n't",
];

// Last words that mark a capitalized run as a company name
const ORG_SUFFIXES: &[&str] = &[
    "ltd", "limited", "inc", "incorporated", "corp", "corporation", "co", "company", "llp", "llc",
    "plc", "pvt", "private", "group", "holding", "holdings", "bank", "securities", "capital",
    "finance", "financial", "financials", "services", "industries", "enterprises", "ventures",
    "investments", "partners", "broking", "research", "equities", "equity", "institutional",
    "technologies", "motors", "pharma", "pharmaceuticals", "infra", "infrastructure", "power",
    "steel", "cement", "foods", "labs", "laboratories", "exchange", "trust", "fund", "funds",
    "insurance", "management", "advisors", "associates", "solutions", "systems", "international",
    "global", "agency", "institute", "university",
];

const PERSON_TITLES: &[&str] = &["mr", "mrs", "ms", "dr", "prof", "shri", "smt", "sri"];

// Lowercase words allowed inside a capitalized run ("Bank of Baroda", "Johnson & Johnson")
const CONNECTORS: &[&str] = &["of", "the", "&"];

static STOP_WORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOP_WORDS.iter().copied().collect());

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORD_SET.contains(word.to_lowercase().as_str())
}

fn normalized(word: &str) -> String {
    word.trim_end_matches('.').to_lowercase()
}

pub fn is_org_suffix(word: &str) -> bool {
    ORG_SUFFIXES.contains(&normalized(word).as_str())
}

pub fn is_person_title(word: &str) -> bool {
    PERSON_TITLES.contains(&normalized(word).as_str())
}

pub fn is_connector(word: &str) -> bool {
    CONNECTORS.contains(&word.to_lowercase().as_str())
}
