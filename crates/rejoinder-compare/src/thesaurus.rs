//! Thesaurus lookups and the [`Taxonomy`] hypernym graph.
//!
//! A word maps to zero or more *senses*; senses are linked upward to their
//! hypernyms (`cat → feline → carnivore → mammal → …`).  Path similarity
//! between two senses is
//!
//! ```text
//! 1 / (1 + shortest path length through a common ancestor)
//! ```
//!
//! so identical senses score `1.0`, a sense and its direct hypernym `0.5`,
//! and senses with no common ancestor have no similarity at all (`None`).
//!
//! # Taxonomy files
//!
//! [`Taxonomy::from_json_file`] reads a JSON array of [`SenseDef`]:
//!
//! ```json
//! [
//!   { "id": "animal.n.01", "lemmas": ["animal"] },
//!   { "id": "cat.n.01", "hypernyms": ["animal.n.01"], "lemmas": ["cat", "kitty"] }
//! ]
//! ```

use std::collections::{HashMap, VecDeque};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::CompareError;

/// Index of a sense inside a [`Thesaurus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SenseId(pub usize);

/// Sense lookup and taxonomic similarity.
pub trait Thesaurus: Send + Sync {
    /// Senses of `word` (lowercase).  Empty when the word is unknown.
    fn senses(&self, word: &str) -> Vec<SenseId>;

    /// Path similarity in `(0.0, 1.0]`, or `None` when the senses share no
    /// ancestor.
    fn path_similarity(&self, a: SenseId, b: SenseId) -> Option<f64>;
}

/// One sense in a taxonomy definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenseDef {
    pub id: String,
    #[serde(default)]
    pub hypernyms: Vec<String>,
    #[serde(default)]
    pub lemmas: Vec<String>,
}

/// A directed hypernym graph with a lemma index.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    names: Vec<String>,
    parents: Vec<Vec<usize>>,
    lemma_index: HashMap<String, Vec<SenseId>>,
}

impl Taxonomy {
    /// Build a taxonomy from sense definitions.
    ///
    /// Definitions sharing an `id` are merged.  Hypernyms naming an unknown
    /// sense are skipped with a warning.
    pub fn from_defs(defs: impl IntoIterator<Item = SenseDef>) -> Self {
        let defs: Vec<SenseDef> = defs.into_iter().collect();
        let mut taxonomy = Taxonomy::default();
        let mut ids: HashMap<String, usize> = HashMap::new();

        for def in &defs {
            if !ids.contains_key(&def.id) {
                ids.insert(def.id.clone(), taxonomy.names.len());
                taxonomy.names.push(def.id.clone());
                taxonomy.parents.push(Vec::new());
            }
        }

        for def in defs {
            let idx = ids[&def.id];
            for hypernym in &def.hypernyms {
                match ids.get(hypernym) {
                    Some(&parent) if parent != idx => {
                        if !taxonomy.parents[idx].contains(&parent) {
                            taxonomy.parents[idx].push(parent);
                        }
                    }
                    Some(_) => warn!(sense = %def.id, "ignoring self-referencing hypernym"),
                    None => warn!(sense = %def.id, hypernym = %hypernym, "unknown hypernym; skipping"),
                }
            }
            for lemma in def.lemmas {
                let senses = taxonomy.lemma_index.entry(lemma.to_lowercase()).or_default();
                if !senses.contains(&SenseId(idx)) {
                    senses.push(SenseId(idx));
                }
            }
        }
        taxonomy
    }

    /// Parse a JSON array of [`SenseDef`].
    pub fn from_json_str(json: &str) -> Result<Self, CompareError> {
        let defs: Vec<SenseDef> = serde_json::from_str(json)?;
        Ok(Self::from_defs(defs))
    }

    /// Load a taxonomy from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CompareError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// The small general-purpose taxonomy bundled with the crate.
    pub fn builtin() -> Self {
        Self::from_defs(BUILTIN_SENSES.iter().map(|(id, hypernyms, lemmas)| SenseDef {
            id: (*id).to_string(),
            hypernyms: hypernyms.iter().map(|h| (*h).to_string()).collect(),
            lemmas: lemmas.iter().map(|l| (*l).to_string()).collect(),
        }))
    }

    /// Number of senses.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Identifier of `sense`, e.g. `"cat.n.01"`.
    pub fn sense_name(&self, sense: SenseId) -> Option<&str> {
        self.names.get(sense.0).map(String::as_str)
    }

    /// Every lemma the taxonomy knows.
    pub fn lemmas(&self) -> impl Iterator<Item = &str> {
        self.lemma_index.keys().map(String::as_str)
    }

    /// Shortest upward distance from `start` to each of its ancestors
    /// (including itself at distance 0).
    fn ancestor_distances(&self, start: usize) -> HashMap<usize, usize> {
        let mut distances = HashMap::from([(start, 0)]);
        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            let d = distances[&node];
            for &parent in &self.parents[node] {
                if !distances.contains_key(&parent) {
                    distances.insert(parent, d + 1);
                    queue.push_back(parent);
                }
            }
        }
        distances
    }
}

impl Thesaurus for Taxonomy {
    fn senses(&self, word: &str) -> Vec<SenseId> {
        self.lemma_index.get(word).cloned().unwrap_or_default()
    }

    fn path_similarity(&self, a: SenseId, b: SenseId) -> Option<f64> {
        if a.0 >= self.names.len() || b.0 >= self.names.len() {
            return None;
        }
        if a == b {
            return Some(1.0);
        }
        let from_a = self.ancestor_distances(a.0);
        let from_b = self.ancestor_distances(b.0);
        from_a
            .iter()
            .filter_map(|(node, da)| from_b.get(node).map(|db| da + db))
            .min()
            .map(|distance| 1.0 / (1.0 + distance as f64))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Built-in senses: (id, hypernyms, lemmas)
// ─────────────────────────────────────────────────────────────────────────────

type BuiltinSense = (&'static str, &'static [&'static str], &'static [&'static str]);

const BUILTIN_SENSES: &[BuiltinSense] = &[
    // nouns
    ("entity.n.01", &[], &["entity"]),
    ("physical_entity.n.01", &["entity.n.01"], &[]),
    ("abstraction.n.06", &["entity.n.01"], &["abstraction"]),
    ("object.n.01", &["physical_entity.n.01"], &["object", "thing"]),
    ("whole.n.02", &["object.n.01"], &["whole"]),
    ("living_thing.n.01", &["whole.n.02"], &[]),
    ("organism.n.01", &["living_thing.n.01"], &["organism", "being"]),
    ("person.n.01", &["organism.n.01"], &["person", "individual", "someone", "somebody", "human"]),
    ("friend.n.01", &["person.n.01"], &["friend", "buddy", "pal"]),
    ("child.n.01", &["person.n.01"], &["child", "kid"]),
    ("adult.n.01", &["person.n.01"], &["adult", "grownup"]),
    ("man.n.01", &["adult.n.01"], &["man"]),
    ("woman.n.01", &["adult.n.01"], &["woman", "lady"]),
    ("animal.n.01", &["organism.n.01"], &["animal", "creature", "beast"]),
    ("pet.n.01", &["animal.n.01"], &["pet"]),
    ("vertebrate.n.01", &["animal.n.01"], &["vertebrate"]),
    ("mammal.n.01", &["vertebrate.n.01"], &["mammal"]),
    ("carnivore.n.01", &["mammal.n.01"], &["carnivore"]),
    ("feline.n.01", &["carnivore.n.01"], &["feline", "felid"]),
    ("cat.n.01", &["feline.n.01"], &["cat", "kitty", "kitten"]),
    ("lion.n.01", &["feline.n.01"], &["lion"]),
    ("canine.n.02", &["carnivore.n.01"], &["canine"]),
    ("dog.n.01", &["canine.n.02"], &["dog", "puppy", "hound"]),
    ("wolf.n.01", &["canine.n.02"], &["wolf"]),
    ("bird.n.01", &["vertebrate.n.01"], &["bird"]),
    ("fish.n.01", &["vertebrate.n.01"], &["fish"]),
    ("plant.n.02", &["organism.n.01"], &["plant", "flora"]),
    ("tree.n.01", &["plant.n.02"], &["tree"]),
    ("flower.n.01", &["plant.n.02"], &["flower"]),
    ("artifact.n.01", &["whole.n.02"], &["artifact", "artefact"]),
    ("instrumentality.n.03", &["artifact.n.01"], &["instrumentality"]),
    ("device.n.01", &["instrumentality.n.03"], &["device", "gadget"]),
    ("computer.n.01", &["device.n.01"], &["computer", "pc", "laptop"]),
    ("telephone.n.01", &["device.n.01"], &["telephone", "phone", "cellphone"]),
    ("conveyance.n.03", &["instrumentality.n.03"], &["conveyance", "transport"]),
    ("vehicle.n.01", &["conveyance.n.03"], &["vehicle"]),
    ("car.n.01", &["vehicle.n.01"], &["car", "automobile", "auto"]),
    ("bicycle.n.01", &["vehicle.n.01"], &["bicycle", "bike"]),
    ("structure.n.01", &["artifact.n.01"], &["structure", "building"]),
    ("house.n.01", &["structure.n.01"], &["house", "home"]),
    ("office.n.01", &["structure.n.01"], &["office"]),
    ("book.n.01", &["artifact.n.01"], &["book"]),
    ("substance.n.01", &["physical_entity.n.01"], &["substance", "matter"]),
    ("water.n.01", &["substance.n.01"], &["water"]),
    ("food.n.01", &["substance.n.01"], &["food", "nutrient"]),
    ("meal.n.01", &["food.n.01"], &["meal", "dinner", "lunch", "breakfast"]),
    ("fruit.n.01", &["food.n.01"], &["fruit"]),
    ("apple.n.01", &["fruit.n.01"], &["apple"]),
    ("banana.n.02", &["fruit.n.01"], &["banana"]),
    ("bread.n.01", &["food.n.01"], &["bread"]),
    ("beverage.n.01", &["food.n.01"], &["beverage", "drink"]),
    ("coffee.n.01", &["beverage.n.01"], &["coffee"]),
    ("tea.n.01", &["beverage.n.01"], &["tea"]),
    ("location.n.01", &["physical_entity.n.01"], &["location", "place"]),
    ("city.n.01", &["location.n.01"], &["city", "town"]),
    ("country.n.02", &["location.n.01"], &["country", "nation"]),
    ("communication.n.02", &["abstraction.n.06"], &["communication"]),
    ("greeting.n.01", &["communication.n.02"], &["greeting", "salutation", "hello", "hi", "hey", "howdy", "hiya"]),
    ("farewell.n.02", &["communication.n.02"], &["farewell", "goodbye", "bye"]),
    ("question.n.01", &["communication.n.02"], &["question", "query"]),
    ("answer.n.01", &["communication.n.02"], &["answer", "reply", "response"]),
    ("conversation.n.01", &["communication.n.02"], &["conversation", "chat", "talk"]),
    ("thanks.n.01", &["communication.n.02"], &["thanks", "thank"]),
    ("language.n.01", &["communication.n.02"], &["language"]),
    ("word.n.01", &["language.n.01"], &["word"]),
    ("name.n.01", &["word.n.01"], &["name"]),
    ("attribute.n.02", &["abstraction.n.06"], &["attribute"]),
    ("state.n.02", &["attribute.n.02"], &["state", "condition"]),
    ("feeling.n.01", &["state.n.02"], &["feeling", "emotion", "mood"]),
    ("happiness.n.01", &["feeling.n.01"], &["happiness", "joy"]),
    ("sadness.n.01", &["feeling.n.01"], &["sadness", "sorrow"]),
    ("hunger.n.01", &["feeling.n.01"], &["hunger", "appetite"]),
    ("measure.n.02", &["abstraction.n.06"], &["measure"]),
    ("time_period.n.01", &["measure.n.02"], &["period"]),
    ("time.n.05", &["measure.n.02"], &["time"]),
    ("day.n.01", &["time_period.n.01"], &["day"]),
    ("night.n.01", &["time_period.n.01"], &["night"]),
    ("morning.n.01", &["time_period.n.01"], &["morning"]),
    ("evening.n.01", &["time_period.n.01"], &["evening"]),
    ("week.n.01", &["time_period.n.01"], &["week"]),
    ("phenomenon.n.01", &["abstraction.n.06"], &["phenomenon"]),
    ("weather.n.01", &["phenomenon.n.01"], &["weather"]),
    ("rain.n.01", &["weather.n.01"], &["rain"]),
    ("snow.n.01", &["weather.n.01"], &["snow"]),
    ("music.n.01", &["communication.n.02"], &["music", "song"]),
    ("game.n.01", &["abstraction.n.06"], &["game", "sport"]),
    // verbs
    ("act.v.01", &[], &["act", "do"]),
    ("travel.v.01", &[], &["travel", "go", "move"]),
    ("walk.v.01", &["travel.v.01"], &["walk"]),
    ("run.v.01", &["travel.v.01"], &["run"]),
    ("communicate.v.02", &[], &["communicate"]),
    ("talk.v.01", &["communicate.v.02"], &["talk", "speak"]),
    ("say.v.01", &["communicate.v.02"], &["say", "tell"]),
    ("ask.v.01", &["communicate.v.02"], &["ask", "inquire"]),
    ("greet.v.01", &["communicate.v.02"], &["greet", "welcome"]),
    ("consume.v.02", &[], &["consume"]),
    ("eat.v.01", &["consume.v.02"], &["eat"]),
    ("drink.v.01", &["consume.v.02"], &["drink"]),
    ("feel.v.01", &[], &["feel"]),
    ("like.v.02", &["feel.v.01"], &["like", "love", "enjoy"]),
    ("know.v.01", &[], &["know"]),
    ("think.v.01", &[], &["think", "believe"]),
    ("help.v.01", &[], &["help", "assist", "aid"]),
    ("want.v.01", &[], &["want", "need", "wish"]),
    ("sleep.v.01", &[], &["sleep"]),
    ("work.v.01", &["act.v.01"], &["work"]),
    ("play.v.01", &["act.v.01"], &["play"]),
    // adjectives and adverbs have no hypernyms
    ("good.a.01", &[], &["good", "nice", "great", "fine"]),
    ("bad.a.01", &[], &["bad", "awful", "terrible"]),
    ("hungry.a.01", &[], &["hungry", "starving"]),
    ("happy.a.01", &[], &["happy", "glad"]),
    ("sad.a.01", &[], &["sad", "unhappy"]),
    ("young.a.01", &[], &["young"]),
    ("old.a.01", &[], &["old"]),
    ("big.a.01", &[], &["big", "large"]),
    ("small.a.01", &[], &["small", "little"]),
    ("very.r.01", &[], &["very", "really"]),
];
