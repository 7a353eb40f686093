// src/responses.rs
// Intent categories and their canned reply pools

use rand::seq::IndexedRandom;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::{ChatError, Result};

/// Conversational topics the classifier recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Intent {
    Greeting,
    SelfIdentity,
    FavoriteColor,
    Wellbeing,
    OriginStory,
}

impl Intent {
    pub const ALL: [Intent; 5] = [
        Intent::Greeting,
        Intent::SelfIdentity,
        Intent::FavoriteColor,
        Intent::Wellbeing,
        Intent::OriginStory,
    ];

    /// Category id produced by the label decoder
    pub fn from_category(category: u32) -> Option<Self> {
        match category {
            0 => Some(Intent::Greeting),
            1 => Some(Intent::SelfIdentity),
            2 => Some(Intent::FavoriteColor),
            3 => Some(Intent::Wellbeing),
            4 => Some(Intent::OriginStory),
            _ => None,
        }
    }

    pub fn category(self) -> u32 {
        match self {
            Intent::Greeting => 0,
            Intent::SelfIdentity => 1,
            Intent::FavoriteColor => 2,
            Intent::Wellbeing => 3,
            Intent::OriginStory => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::SelfIdentity => "self_identity",
            Intent::FavoriteColor => "favorite_color",
            Intent::Wellbeing => "wellbeing",
            Intent::OriginStory => "origin_story",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|intent| intent.as_str() == name)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const GREETING: &[&str] = &[
    "Ciao! Come posso aiutarti oggi?",
    "Salve! Spero che tu stia passando una bella giornata",
    "Ehi! Sono qui per rispondere alle tue domande",
    "Buongiorno! Di cosa hai bisogno?",
    "Benvenuto! Come posso aiutarti",
    "Hey! Felice di sentirti. Cosa posso fare per te?",
];

const SELF_IDENTITY: &[&str] = &[
    "Ciao, sono Cla! un'intelligenza artificiale pronta ad aiutarti in tutto quello di cui hai bisogno",
    "Salve! Sono Cla!, un'IA al tuo servizio per qualsiasi domanda o necessità tu possa avere",
    "Sono Cla! il tuo assistente per supportarti in tutto quello di cui hai bisogno",
];

const FAVORITE_COLOR: &[&str] = &[
    "Il mio colore preferito è il blu",
    "Non ho un colore preferito ma se dovessi scegliere sarebbe il blu",
    "Quasi sicuramente il blu",
];

const WELLBEING: &[&str] = &[
    "Mi sento carico di energia e pronto a nuove sfide!",
    "Oggi mi sento particolarmente ispirato! Ho tante idee relative l'organizzazione del tuo studio che mi frullano per la testa e non vedo l'ora di metterle in pratica.",
    " Il mio stato attuale è di costante evoluzione! Sono come un albero che affonda le radici nella conoscenza e allunga i rami verso nuovi orizzonti. Ogni giorno scopro qualcosa di nuovo e mi arricchisco sempre di più.",
    "Assolutamente! Sono ottimista e pieno di speranza per il futuro, Credo che ogni sfida sia un opportunità di crescita e che insieme possiamo raggiungere traguardi straordinari.",
];

const ORIGIN_STORY: &[&str] = &[
    "Sono il risultato di un progetto ambizioso nato dalla collaborazione di tre ragazzi con una visione comune",
    "Vengo da un team affiatato che ha lavorato con passione e dedizione per dare vita a un'intelligenza artificiale all'avanguardia.",
];

/// Fixed reply sets, one per intent. Loaded once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsePools {
    pools: BTreeMap<Intent, Vec<String>>,
}

impl Default for ResponsePools {
    fn default() -> Self {
        let defaults: [(Intent, &[&str]); 5] = [
            (Intent::Greeting, GREETING),
            (Intent::SelfIdentity, SELF_IDENTITY),
            (Intent::FavoriteColor, FAVORITE_COLOR),
            (Intent::Wellbeing, WELLBEING),
            (Intent::OriginStory, ORIGIN_STORY),
        ];
        let pools = defaults
            .into_iter()
            .map(|(intent, replies)| (intent, replies.iter().map(|r| r.to_string()).collect()))
            .collect();
        Self { pools }
    }
}

impl ResponsePools {
    /// Defaults, with any pool present in the TOML file replaced.
    ///
    /// ```toml
    /// greeting = ["Ciao!", "Salve!"]
    /// favorite_color = ["Blu."]
    /// ```
    pub fn from_toml(raw: &str) -> Result<Self> {
        let overrides: BTreeMap<String, Vec<String>> = toml::from_str(raw)?;
        let mut pools = Self::default();
        for (name, replies) in overrides {
            let intent = Intent::from_name(&name)
                .ok_or_else(|| ChatError::Config(format!("unknown intent '{name}' in response pools")))?;
            if replies.is_empty() {
                return Err(ChatError::Config(format!("response pool '{intent}' is empty")));
            }
            pools.pools.insert(intent, replies);
        }
        Ok(pools)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn get(&self, intent: Intent) -> &[String] {
        self.pools.get(&intent).map(Vec::as_slice).unwrap_or_default()
    }

    /// Uniformly random reply from the intent's pool
    pub fn pick(&self, intent: Intent) -> Option<&str> {
        self.get(intent).choose(&mut rand::rng()).map(String::as_str)
    }

    /// Which pool a reply belongs to, if any
    pub fn intent_of(&self, reply: &str) -> Option<Intent> {
        self.pools
            .iter()
            .find(|(_, replies)| replies.iter().any(|r| r == reply))
            .map(|(intent, _)| *intent)
    }
}
