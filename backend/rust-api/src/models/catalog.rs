use std::collections::HashMap;

use crate::models::content::{Category, Subject};

/// A themed pairing table: left entries and the right-hand value each one
/// connects to. Right values are not necessarily unique (conjugation tables
/// repeat forms across subjects).
#[derive(Debug, Clone)]
pub struct PairingTheme {
    pub name: String,
    pub pairs: Vec<(String, String)>,
    /// How many pairs one round draws from the table.
    pub draw: usize,
}

#[derive(Debug, Clone)]
pub struct ClassificationTheme {
    pub name: String,
    pub categories: Vec<Category>,
    /// (word, category name)
    pub words: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct SentenceBank {
    pub sentences: Vec<String>,
    /// The full set of acceptable corrected sentences for the game.
    pub accepted: Vec<String>,
    pub tools: Vec<String>,
}

/// Read-only theme tables handed to the content provider. The engine never
/// mutates these.
#[derive(Debug, Clone)]
pub struct GameCatalog {
    pub pairing: HashMap<Subject, Vec<PairingTheme>>,
    pub classification: Vec<ClassificationTheme>,
    pub ponctuation: SentenceBank,
    pub pronoms: SentenceBank,
}

fn pairs(table: &[(&str, &str)]) -> Vec<(String, String)> {
    table
        .iter()
        .map(|(l, r)| (l.to_string(), r.to_string()))
        .collect()
}

fn category(name: &str, definition: &str) -> Category {
    Category {
        name: name.to_string(),
        definition: definition.to_string(),
    }
}

impl GameCatalog {
    pub fn pairing_themes(&self, subject: Subject) -> Option<&[PairingTheme]> {
        self.pairing.get(&subject).map(Vec::as_slice)
    }

    /// The built-in catalog: a representative subset of the production
    /// content tables, enough to run every game.
    pub fn builtin() -> Self {
        let mut pairing = HashMap::new();

        pairing.insert(
            Subject::English,
            vec![
                PairingTheme {
                    name: "rooms".to_string(),
                    draw: 5,
                    pairs: pairs(&[
                        ("Kitchen", "Cuisine"),
                        ("Living room", "Salon"),
                        ("Bedroom", "Chambre"),
                        ("Bathroom", "Salle de bain"),
                        ("Garden", "Jardin"),
                        ("Office", "Bureau"),
                        ("Dining room", "Salle à manger"),
                    ]),
                },
                PairingTheme {
                    name: "days".to_string(),
                    draw: 5,
                    pairs: pairs(&[
                        ("Monday", "Lundi"),
                        ("Tuesday", "Mardi"),
                        ("Wednesday", "Mercredi"),
                        ("Thursday", "Jeudi"),
                        ("Friday", "Vendredi"),
                        ("Saturday", "Samedi"),
                        ("Sunday", "Dimanche"),
                    ]),
                },
                PairingTheme {
                    name: "family".to_string(),
                    draw: 5,
                    pairs: pairs(&[
                        ("Father", "Père"),
                        ("Mother", "Mère"),
                        ("Brother", "Frère"),
                        ("Sister", "Soeur"),
                        ("Grandfather", "Grand-père"),
                        ("Grandmother", "Grand-mère"),
                        ("Uncle", "Oncle"),
                        ("Aunt", "Tante"),
                    ]),
                },
                PairingTheme {
                    name: "numbers".to_string(),
                    draw: 5,
                    pairs: pairs(&[
                        ("One", "1"),
                        ("Two", "2"),
                        ("Three", "3"),
                        ("Four", "4"),
                        ("Five", "5"),
                        ("Six", "6"),
                        ("Seven", "7"),
                        ("Eight", "8"),
                        ("Nine", "9"),
                        ("Ten", "10"),
                    ]),
                },
            ],
        );

        // French `relier` connects subject pronouns to conjugated forms.
        pairing.insert(
            Subject::French,
            vec![
                PairingTheme {
                    name: "manger".to_string(),
                    draw: 6,
                    pairs: pairs(&[
                        ("je", "mange"),
                        ("tu", "manges"),
                        ("il,elle", "mange"),
                        ("nous", "mangeons"),
                        ("vous", "mangez"),
                        ("ils,elles", "mangent"),
                    ]),
                },
                PairingTheme {
                    name: "faire".to_string(),
                    draw: 6,
                    pairs: pairs(&[
                        ("je", "fais"),
                        ("tu", "fais"),
                        ("il,elle", "fait"),
                        ("nous", "faisons"),
                        ("vous", "faites"),
                        ("ils,elles", "font"),
                    ]),
                },
                PairingTheme {
                    name: "venir".to_string(),
                    draw: 6,
                    pairs: pairs(&[
                        ("je", "viens"),
                        ("tu", "viens"),
                        ("il,elle", "vient"),
                        ("nous", "venons"),
                        ("vous", "venez"),
                        ("ils,elles", "viennent"),
                    ]),
                },
                PairingTheme {
                    name: "lire".to_string(),
                    draw: 6,
                    pairs: pairs(&[
                        ("je", "lis"),
                        ("tu", "lis"),
                        ("il,elle", "lit"),
                        ("nous", "lisons"),
                        ("vous", "lisez"),
                        ("ils,elles", "lisent"),
                    ]),
                },
            ],
        );

        let classification = vec![
            ClassificationTheme {
                name: "marin-terrestre-aerien".to_string(),
                categories: vec![
                    category("Marin", "Les créatures marines vivent dans l'eau."),
                    category("Terrestre", "Les animaux terrestres vivent sur terre."),
                    category("Aérien", "Les animaux aériens vivent dans les airs."),
                ],
                words: pairs(&[
                    ("requin", "Marin"),
                    ("saumon", "Marin"),
                    ("baleine", "Marin"),
                    ("phoque", "Marin"),
                    ("Lion", "Terrestre"),
                    ("Serpent", "Terrestre"),
                    ("chat", "Terrestre"),
                    ("vache", "Terrestre"),
                    ("aigle", "Aérien"),
                    ("mouette", "Aérien"),
                    ("corbeau", "Aérien"),
                    ("hibou", "Aérien"),
                ]),
            },
            ClassificationTheme {
                name: "carnivore-herbivore-omnivore".to_string(),
                categories: vec![
                    category(
                        "Carnivore",
                        "Les carnivores se nourrissent principalement de viande.",
                    ),
                    category(
                        "Herbivore",
                        "Les herbivores se nourrissent principalement de plantes.",
                    ),
                    category(
                        "Omnivore",
                        "Les omnivores mangent à la fois des plantes et des animaux.",
                    ),
                ],
                words: pairs(&[
                    ("lion", "Carnivore"),
                    ("tigre", "Carnivore"),
                    ("loup", "Carnivore"),
                    ("éléphant", "Herbivore"),
                    ("girafe", "Herbivore"),
                    ("vache", "Herbivore"),
                    ("ours", "Omnivore"),
                    ("cochon", "Omnivore"),
                    ("panda", "Omnivore"),
                ]),
            },
            ClassificationTheme {
                name: "ovipare-vivipare".to_string(),
                categories: vec![
                    category(
                        "Ovipare",
                        "Les animaux ovipares pondent des œufs qui se développent à l'extérieur du corps.",
                    ),
                    category(
                        "Vivipare",
                        "Les animaux vivipares donnent naissance à des petits déjà formés.",
                    ),
                ],
                words: pairs(&[
                    ("tortue", "Ovipare"),
                    ("serpent", "Ovipare"),
                    ("poisson", "Ovipare"),
                    ("oiseau", "Ovipare"),
                    ("chat", "Vivipare"),
                    ("chien", "Vivipare"),
                    ("kangourou", "Vivipare"),
                    ("cheval", "Vivipare"),
                ]),
            },
            ClassificationTheme {
                name: "vivant-non-vivant".to_string(),
                categories: vec![
                    category(
                        "Vivant",
                        "Les éléments vivants croissent, se reproduisent et effectuent des processus biologiques.",
                    ),
                    category(
                        "Non-Vivant",
                        "Les éléments non vivants ne possèdent pas de telles capacités.",
                    ),
                ],
                words: pairs(&[
                    ("chat", "Vivant"),
                    ("arbre", "Vivant"),
                    ("oiseau", "Vivant"),
                    ("poisson", "Vivant"),
                    ("rocher", "Non-Vivant"),
                    ("montagne", "Non-Vivant"),
                    ("voiture", "Non-Vivant"),
                    ("bâtiment", "Non-Vivant"),
                ]),
            },
        ];

        let ponctuation = SentenceBank {
            sentences: vec![
                "harry mange à la table de gryffondor ron lui parle de sa dernière aventure"
                    .to_string(),
                "hermione étudie dans la bibliothèque harry et ron jouent aux échecs magiques"
                    .to_string(),
                "dumbledore parle aux élèves dans la grande salle harry écoute attentivement"
                    .to_string(),
                "neville trébuche dans le hall ginny lui tend la main pour l’aider".to_string(),
            ],
            accepted: vec![
                "Harry mange à la table de Gryffondor, Ron lui parle de sa dernière aventure."
                    .to_string(),
                "Hermione étudie dans la bibliothèque, Harry et Ron jouent aux échecs magiques."
                    .to_string(),
                "Dumbledore parle aux élèves dans la grande salle, Harry écoute attentivement."
                    .to_string(),
                "Neville trébuche dans le hall, Ginny lui tend la main pour l’aider.".to_string(),
            ],
            tools: vec!["uppercase".to_string(), ",".to_string(), ".".to_string()],
        };

        let pronoms = SentenceBank {
            sentences: vec![
                "Moi et Harry rentrons à Poudlard en septembre.".to_string(),
                "Ron et moi adorons le Quidditch.".to_string(),
                "Les élèves et toi allez à Pré-au-Lard mercredi soir.".to_string(),
                "Papa et maman nous accompagnent à la gare.".to_string(),
                "Hermione et Luna parlent de leur prochain examen.".to_string(),
                "Cho Chang lit un livre étrange.".to_string(),
                "Drago décore le sapin de Noël avec ses amis.".to_string(),
            ],
            accepted: vec![
                "nous rentrons à Poudlard en septembre.".to_string(),
                "nous adorons le Quidditch.".to_string(),
                "vous allez à Pré-au-Lard mercredi soir.".to_string(),
                "ils nous accompagnent à la gare.".to_string(),
                "elles parlent de leur prochain examen.".to_string(),
                "elle lit un livre étrange.".to_string(),
                "il décore le sapin de Noël avec ses amis.".to_string(),
            ],
            tools: vec![
                "il".to_string(),
                "elle".to_string(),
                "nous".to_string(),
                "vous".to_string(),
                "ils".to_string(),
                "elles".to_string(),
            ],
        };

        Self {
            pairing,
            classification,
            ponctuation,
            pronoms,
        }
    }
}
