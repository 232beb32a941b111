//! Topic verse library.
//!
//! A small static table of common prayer topics with associated verses.
//! The CLI uses it as the offline fallback when the suggestion client
//! fails: the user still gets something devotional rather than an error
//! page.

use rand::prelude::IndexedRandom;
use serde::Serialize;

/// A verse with its reference, as rendered to the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Verse {
    pub reference: &'static str,
    pub text: &'static str,
}

pub struct TopicVerses {
    pub topic: &'static str,
    pub verses: &'static [Verse],
}

pub const TOPICS: &[TopicVerses] = &[
    TopicVerses {
        topic: "Strength and Courage",
        verses: &[
            Verse {
                reference: "Joshua 1:9",
                text: "Be strong and courageous. Do not be afraid; do not be discouraged, for the LORD your God will be with you wherever you go.",
            },
            Verse {
                reference: "Isaiah 41:10",
                text: "So do not fear, for I am with you; do not be dismayed, for I am your God. I will strengthen you and help you; I will uphold you with my righteous right hand.",
            },
            Verse {
                reference: "Philippians 4:13",
                text: "I can do all this through him who gives me strength.",
            },
        ],
    },
    TopicVerses {
        topic: "Healing and Health",
        verses: &[
            Verse {
                reference: "Jeremiah 30:17",
                text: "But I will restore you to health and heal your wounds, declares the LORD.",
            },
            Verse {
                reference: "James 5:14-15",
                text: "Is anyone among you sick? Let them call the elders of the church to pray over them and anoint them with oil in the name of the Lord. And the prayer offered in faith will make the sick person well; the Lord will raise them up.",
            },
            Verse {
                reference: "Psalm 103:2-3",
                text: "Praise the LORD, my soul, and forget not all his benefits—who forgives all your sins and heals all your diseases.",
            },
        ],
    },
    TopicVerses {
        topic: "Guidance and Direction",
        verses: &[
            Verse {
                reference: "Proverbs 3:5-6",
                text: "Trust in the LORD with all your heart and lean not on your own understanding; in all your ways submit to him, and he will make your paths straight.",
            },
            Verse {
                reference: "Psalm 32:8",
                text: "I will instruct you and teach you in the way you should go; I will counsel you with my loving eye on you.",
            },
            Verse {
                reference: "John 16:13",
                text: "But when he, the Spirit of truth, comes, he will guide you into all the truth.",
            },
        ],
    },
    TopicVerses {
        topic: "Gratitude and Thanksgiving",
        verses: &[
            Verse {
                reference: "1 Thessalonians 5:16-18",
                text: "Rejoice always, pray continually, give thanks in all circumstances; for this is God's will for you in Christ Jesus.",
            },
            Verse {
                reference: "Psalm 107:1",
                text: "Give thanks to the LORD, for he is good; his love endures forever.",
            },
            Verse {
                reference: "Colossians 3:17",
                text: "And whatever you do, whether in word or deed, do it all in the name of the Lord Jesus, giving thanks to God the Father through him.",
            },
        ],
    },
    TopicVerses {
        topic: "Peace and Comfort",
        verses: &[
            Verse {
                reference: "John 14:27",
                text: "Peace I leave with you; my peace I give you. I do not give to you as the world gives. Do not let your hearts be troubled and do not be afraid.",
            },
            Verse {
                reference: "Philippians 4:6-7",
                text: "Do not be anxious about anything, but in every situation, by prayer and petition, with thanksgiving, present your requests to God. And the peace of God, which transcends all understanding, will guard your hearts and your minds in Christ Jesus.",
            },
            Verse {
                reference: "Psalm 34:18",
                text: "The LORD is close to the brokenhearted and saves those who are crushed in spirit.",
            },
        ],
    },
    TopicVerses {
        topic: "Wisdom and Knowledge",
        verses: &[
            Verse {
                reference: "James 1:5",
                text: "If any of you lacks wisdom, you should ask God, who gives generously to all without finding fault, and it will be given to you.",
            },
            Verse {
                reference: "Proverbs 2:6",
                text: "For the LORD gives wisdom; from his mouth come knowledge and understanding.",
            },
            Verse {
                reference: "Colossians 1:9-10",
                text: "We continually ask God to fill you with the knowledge of his will through all the wisdom and understanding that the Spirit gives.",
            },
        ],
    },
    TopicVerses {
        topic: "Family and Relationships",
        verses: &[
            Verse {
                reference: "Ephesians 4:2-3",
                text: "Be completely humble and gentle; be patient, bearing with one another in love. Make every effort to keep the unity of the Spirit through the bond of peace.",
            },
            Verse {
                reference: "Colossians 3:13-14",
                text: "Bear with each other and forgive one another if any of you has a grievance against someone. Forgive as the Lord forgave you. And over all these virtues put on love, which binds them all together in perfect unity.",
            },
            Verse {
                reference: "1 Peter 4:8",
                text: "Above all, love each other deeply, because love covers over a multitude of sins.",
            },
        ],
    },
];

/// Topic names, in table order.
pub fn topics() -> Vec<&'static str> {
    TOPICS.iter().map(|t| t.topic).collect()
}

/// Verses for a topic. Lookup is case-insensitive.
pub fn verses_for(topic: &str) -> Option<&'static [Verse]> {
    TOPICS
        .iter()
        .find(|t| t.topic.eq_ignore_ascii_case(topic))
        .map(|t| t.verses)
}

/// One randomly chosen verse for a topic.
pub fn random_verse(topic: &str) -> Option<&'static Verse> {
    verses_for(topic)?.choose(&mut rand::rng())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seven_topics_three_verses_each() {
        assert_eq!(TOPICS.len(), 7);
        for t in TOPICS {
            assert_eq!(t.verses.len(), 3, "topic {}", t.topic);
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert!(verses_for("peace and comfort").is_some());
        assert!(verses_for("Peace and Comfort").is_some());
    }

    #[test]
    fn unknown_topic_yields_none() {
        assert!(verses_for("Weather").is_none());
        assert!(random_verse("Weather").is_none());
    }

    #[test]
    fn random_verse_comes_from_the_topic() {
        let verses = verses_for("Guidance and Direction").unwrap();
        let picked = random_verse("Guidance and Direction").unwrap();
        assert!(verses.iter().any(|v| v == picked));
    }
}
