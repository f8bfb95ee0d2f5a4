//! Records shipped with the map

use chrono::NaiveDate;

use crate::api::{Comment, CommentId, CommentTag, Disaster, DisasterId, DisasterKind, Location, StoryLink};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("seed dates are valid")
}

fn stories(links: &[(&str, &str)]) -> Vec<StoryLink> {
    links
        .iter()
        .map(|(title, url)| StoryLink {
            title: title.to_string(),
            url: url.to_string(),
        })
        .collect()
}

pub fn disasters() -> Vec<Disaster> {
    vec![
        Disaster {
            id: DisasterId(1),
            name: String::from("921 Chi-Chi Earthquake"),
            kind: DisasterKind::Earthquake,
            occurred_on: date(1999, 9, 21),
            location: Location { lat: 23.853, lng: 120.826 },
            description: String::from(
                "A magnitude 7.3 earthquake centered on Jiji, Nantou, causing severe casualties \
                 and damage across Taiwan, one of the deadliest natural disasters in its modern history.",
            ),
            casualty_summary: String::from("2,415 dead, 29 missing, 11,305 injured"),
            stories: stories(&[
                ("Historical voices", "https://www.twreporter.org/a/921-earthquake-20th-historical-voice"),
                ("Mental health recovery", "https://www.twreporter.org/a/921-earthquake-20th-disaster-mental-health-system"),
                ("Series", "https://ourisland.pts.org.tw/content/8274"),
            ]),
        },
        Disaster {
            id: DisasterId(2),
            name: String::from("Typhoon Morakot (88 Flood)"),
            kind: DisasterKind::Typhoon,
            occurred_on: date(2009, 8, 8),
            location: Location { lat: 22.990, lng: 120.218 },
            description: String::from(
                "Record rainfall from Typhoon Morakot triggered floods and mudslides across southern \
                 Taiwan, burying most of Xiaolin village.",
            ),
            casualty_summary: String::from("681 dead, 18 missing"),
            stories: stories(&[
                ("Causes of the disaster", "https://www.twreporter.org/a/bookreview-typhoon-morakot-xiaolin-village-disaster-causes"),
                ("Reconstruction", "https://ourisland.pts.org.tw/content/4980"),
                ("Xiaolin, ten years on", "https://www.twreporter.org/a/typhoon-morakot-10-years-xiaolin-village-relocation"),
            ]),
        },
        Disaster {
            id: DisasterId(3),
            name: String::from("Kaohsiung Gas Explosions"),
            kind: DisasterKind::Fire,
            occurred_on: date(2014, 7, 31),
            location: Location { lat: 22.618, lng: 120.309 },
            description: String::from(
                "Propene leaking from underground pipelines set off a chain of explosions that tore \
                 open several streets of Cianjhen and Lingya districts.",
            ),
            casualty_summary: String::from("32 dead, 321 injured"),
            stories: stories(&[("Looking back", "https://www.gvm.com.tw/article/44256")]),
        },
        Disaster {
            id: DisasterId(4),
            name: String::from("2018 Puyuma Express Derailment"),
            kind: DisasterKind::Accident,
            occurred_on: date(2018, 10, 21),
            location: Location { lat: 24.625, lng: 121.815 },
            description: String::from(
                "Puyuma train 6432 derailed near Xinma station in Yilan, one of the deadliest \
                 railway accidents in recent decades.",
            ),
            casualty_summary: String::from("18 dead, 215 injured"),
            stories: stories(&[
                ("Survivors remember", "https://www.twreporter.org/a/taiwan-train-railway-puyuma-accident-healing"),
                ("A railway in trouble", "https://www.cw.com.tw/special/2439"),
            ]),
        },
        Disaster {
            id: DisasterId(5),
            name: String::from("2016 Tainan Earthquake"),
            kind: DisasterKind::Earthquake,
            occurred_on: date(2016, 2, 6),
            location: Location { lat: 22.93, lng: 120.26 },
            description: String::from(
                "A magnitude 6.6 earthquake centered in Meinong, Kaohsiung, hit Tainan hardest with \
                 the collapse of the Weiguan Jinlong building.",
            ),
            casualty_summary: String::from("117 dead, 551 injured"),
            stories: stories(&[
                ("Survivors", "https://www.twreporter.org/a/0206earthquake-shelter"),
                ("Why it collapsed", "https://ourisland.pts.org.tw/content/2445"),
            ]),
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn comment(
    id: i64,
    author: &str,
    avatar: &str,
    timestamp: &str,
    text: &str,
    tag: CommentTag,
    liked_by: &[&str],
    replies: im::Vector<Comment>,
) -> Comment {
    Comment {
        id: CommentId(id),
        author: author.to_string(),
        avatar: format!("https://i.pravatar.cc/150?u={avatar}"),
        timestamp: timestamp.to_string(),
        text: text.to_string(),
        tag,
        liked_by: liked_by.iter().map(|n| n.to_string()).collect(),
        replies,
    }
}

pub fn comments() -> im::OrdMap<DisasterId, im::Vector<Comment>> {
    let mut res = im::OrdMap::new();
    res.insert(
        DisasterId(1),
        im::vector![
            comment(
                101,
                "Witness",
                "a042581f4e29026704d",
                "3 years ago",
                "I will never forget the shaking that night. At dawn the world looked completely different.",
                CommentTag::Experience,
                &["Preparedness Pro", "Newcomer"],
                im::vector![comment(
                    1011,
                    "Newcomer",
                    "a042581f4e29026704e",
                    "1 year ago",
                    "Thank you for sharing. Textbooks never convey it like a first-hand account.",
                    CommentTag::Reflection,
                    &[],
                    im::Vector::new(),
                )],
            ),
            comment(
                102,
                "Preparedness Pro",
                "a042581f4e29026704f",
                "1 year ago",
                "Keep an emergency bag at home and agree on a meeting point with your family!",
                CommentTag::Suggestion,
                &[],
                im::Vector::new(),
            ),
        ],
    );
    res.insert(
        DisasterId(2),
        im::vector![comment(
            201,
            "Southern Resident",
            "a042581f4e29026704a",
            "2 years ago",
            "It rained for days without stopping. Nobody imagined the water would rise that high.",
            CommentTag::Experience,
            &[],
            im::Vector::new(),
        )],
    );
    res.insert(
        DisasterId(3),
        im::vector![comment(
            301,
            "Kaohsiung Local",
            "a042581f4e29026704b",
            "5 months ago",
            "We thought it was thunder. I still dream of the torn-open streets.",
            CommentTag::Experience,
            &[],
            im::Vector::new(),
        )],
    );
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seed_ids_are_unique() {
        let ds = disasters();
        assert_eq!(ds.iter().map(|d| d.id).collect::<HashSet<_>>().len(), ds.len());

        for forest in comments().values() {
            let ids = forest.iter().flat_map(|c| c.walk()).map(|c| c.id).collect::<Vec<_>>();
            assert_eq!(ids.iter().collect::<HashSet<_>>().len(), ids.len());
        }
    }

    #[test]
    fn seed_comments_belong_to_seed_disasters() {
        let ds = disasters();
        for id in comments().keys() {
            assert!(ds.iter().any(|d| d.id == *id));
        }
    }
}
