use std::collections::{BTreeMap, HashMap};

/// English stop words dropped before weighting, sorted for binary search
const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
    "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside",
    "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call", "can",
    "cannot", "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do",
    "done", "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five",
    "for", "former", "formerly", "forty", "found", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here", "hereafter",
    "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his", "how", "however",
    "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into", "is", "it", "its",
    "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd", "made", "many", "may",
    "me", "meanwhile", "might", "mill", "mine", "more", "moreover", "most", "mostly", "move",
    "much", "must", "my", "myself", "name", "namely", "neither", "never", "nevertheless", "next",
    "nine", "no", "nobody", "none", "noone", "nor", "not", "nothing", "now", "nowhere", "of",
    "off", "often", "on", "once", "one", "only", "onto", "or", "other", "others", "otherwise",
    "our", "ours", "ourselves", "out", "over", "own", "part", "per", "perhaps", "please", "put",
    "rather", "re", "same", "see", "seem", "seemed", "seeming", "seems", "serious", "several",
    "she", "should", "show", "side", "since", "sincere", "six", "sixty", "so", "some", "somehow",
    "someone", "something", "sometime", "sometimes", "somewhere", "still", "such", "system",
    "take", "ten", "than", "that", "the", "their", "them", "themselves", "then", "thence",
    "there", "thereafter", "thereby", "therefore", "therein", "thereupon", "these", "they",
    "thick", "thin", "third", "this", "those", "though", "three", "through", "throughout", "thru",
    "thus", "to", "together", "too", "top", "toward", "towards", "twelve", "twenty", "two", "un",
    "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were", "what",
    "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas", "whereby",
    "wherein", "whereupon", "wherever", "whether", "which", "while", "whither", "who", "whoever",
    "whole", "whom", "whose", "why", "will", "with", "within", "without", "would", "yet", "you",
    "your", "yours", "yourself", "yourselves",
];

/// Sparse document vector as `(term index, weight)` pairs sorted by term index
pub type SparseVector = Vec<(usize, f64)>;

pub fn is_stop_word(token: &str) -> bool {
    ENGLISH_STOP_WORDS.binary_search(&token).is_ok()
}

/// Lowercases text and splits it into word tokens of two or more characters,
/// dropping English stop words
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|s| s.chars().count() >= 2)
        .filter(|s| !is_stop_word(s))
        .map(str::to_string)
        .collect()
}

/// TF-IDF weighting fitted over a fixed document collection
///
/// Raw term counts are scaled by a smoothed inverse document frequency
/// `ln((1 + n) / (1 + df)) + 1` and every row is L2-normalized, so the dot
/// product of two rows is their cosine similarity.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learns the vocabulary and idf weights, returning the weighted rows
    pub fn fit_transform<S: AsRef<str>>(documents: &[S]) -> (Self, Vec<SparseVector>) {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d.as_ref())).collect();

        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for tokens in &tokenized {
            let mut seen: Vec<&String> = tokens.iter().collect();
            seen.sort();
            seen.dedup();
            for term in seen {
                *document_frequency.entry(term.clone()).or_default() += 1;
            }
        }

        let n = documents.len() as f64;
        let vocabulary: BTreeMap<String, usize> = document_frequency
            .keys()
            .enumerate()
            .map(|(index, term)| (term.clone(), index))
            .collect();
        let idf: Vec<f64> = document_frequency
            .values()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let vectorizer = Self { vocabulary, idf };
        let rows = tokenized.iter().map(|tokens| vectorizer.weigh(tokens)).collect();
        (vectorizer, rows)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    fn weigh(&self, tokens: &[String]) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in tokens {
            if let Some(&index) = self.vocabulary.get(token) {
                *counts.entry(index).or_default() += 1.0;
            }
        }

        let mut row: SparseVector = counts
            .into_iter()
            .map(|(index, count)| (index, count * self.idf[index]))
            .collect();
        row.sort_by_key(|&(index, _)| index);

        let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > f64::EPSILON {
            for (_, w) in &mut row {
                *w /= norm;
            }
        }
        row
    }
}

/// Dot product of two sparse vectors sorted by term index
pub fn sparse_dot(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut sum = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}
