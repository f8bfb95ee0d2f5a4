use std::{collections::BTreeSet, str::FromStr};

use anyhow::Context;

use crate::api::{Disaster, DisasterKind};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum KindFilter {
    #[default]
    All,
    Only(DisasterKind),
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DecadeFilter {
    #[default]
    All,
    /// Years in `[decade, decade + 10)`
    Decade(i32),
}

/// What the map currently shows; both axes must match
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Filter {
    pub kind: KindFilter,
    pub decade: DecadeFilter,
}

impl Filter {
    pub fn all() -> Filter {
        Filter::default()
    }

    pub fn matches(&self, d: &Disaster) -> bool {
        let kind_match = match self.kind {
            KindFilter::All => true,
            KindFilter::Only(k) => d.kind == k,
        };
        let decade_match = match self.decade {
            DecadeFilter::All => true,
            DecadeFilter::Decade(start) => {
                let year = d.year();
                start <= year && year < start.saturating_add(10)
            }
        };
        kind_match && decade_match
    }

    /// Keeps the matching disasters, in order
    pub fn apply<'a, I>(&self, disasters: I) -> Vec<&'a Disaster>
    where
        I: IntoIterator<Item = &'a Disaster>,
    {
        disasters.into_iter().filter(|d| self.matches(d)).collect()
    }
}

/// Deduplicated decade buckets, most recent first
pub fn available_decades<'a, I>(disasters: I) -> Vec<i32>
where
    I: IntoIterator<Item = &'a Disaster>,
{
    disasters
        .into_iter()
        .map(|d| d.decade())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .collect()
}

impl FromStr for KindFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<KindFilter> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(KindFilter::All);
        }
        Ok(KindFilter::Only(s.parse()?))
    }
}

impl FromStr for DecadeFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<DecadeFilter> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(DecadeFilter::All);
        }
        let decade = s
            .trim_end_matches('s')
            .parse()
            .with_context(|| format!("parsing decade {s:?}"))?;
        Ok(DecadeFilter::Decade(decade))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{DisasterId, Location};
    use chrono::NaiveDate;

    fn disaster(id: i64, kind: DisasterKind, year: i32) -> Disaster {
        Disaster {
            id: DisasterId(id),
            name: format!("disaster {id}"),
            kind,
            occurred_on: NaiveDate::from_ymd_opt(year, 6, 1).unwrap(),
            location: Location { lat: 23.9, lng: 121. },
            description: String::new(),
            casualty_summary: String::new(),
            stories: Vec::new(),
        }
    }

    fn gen_disasters(shape: &[(DisasterKind, u8)]) -> Vec<Disaster> {
        shape
            .iter()
            .enumerate()
            .map(|(i, (kind, year))| disaster(i as i64, *kind, 1900 + i32::from(*year)))
            .collect()
    }

    fn ids(ds: &[&Disaster]) -> Vec<i64> {
        ds.iter().map(|d| d.id.0).collect()
    }

    #[test]
    fn both_axes_must_match() {
        let ds = vec![
            disaster(1, DisasterKind::Earthquake, 1999),
            disaster(2, DisasterKind::Typhoon, 2009),
            disaster(3, DisasterKind::Earthquake, 2016),
            disaster(4, DisasterKind::Earthquake, 2000),
        ];
        let f = Filter {
            kind: KindFilter::Only(DisasterKind::Earthquake),
            decade: DecadeFilter::Decade(2000),
        };
        assert_eq!(ids(&f.apply(&ds)), vec![4]);

        let f = Filter {
            kind: KindFilter::Only(DisasterKind::Earthquake),
            decade: DecadeFilter::All,
        };
        assert_eq!(ids(&f.apply(&ds)), vec![1, 3, 4]);

        let f = Filter {
            kind: KindFilter::All,
            decade: DecadeFilter::Decade(2000),
        };
        assert_eq!(ids(&f.apply(&ds)), vec![2, 4]);

        let f = Filter {
            kind: KindFilter::Only(DisasterKind::Flood),
            decade: DecadeFilter::All,
        };
        assert!(f.apply(&ds).is_empty());
    }

    #[test]
    fn decades_are_bucketed() {
        let ds = vec![
            disaster(1, DisasterKind::Earthquake, 1999),
            disaster(2, DisasterKind::Typhoon, 2009),
            disaster(3, DisasterKind::Fire, 2014),
            disaster(4, DisasterKind::Accident, 2018),
            disaster(5, DisasterKind::Earthquake, 2016),
        ];
        assert_eq!(available_decades(&ds), vec![2010, 2000, 1990]);
        assert_eq!(available_decades(&Vec::<Disaster>::new()), Vec::<i32>::new());
    }

    #[test]
    fn parsing() {
        assert_eq!("all".parse::<KindFilter>().unwrap(), KindFilter::All);
        assert_eq!(
            "typhoon".parse::<KindFilter>().unwrap(),
            KindFilter::Only(DisasterKind::Typhoon),
        );
        assert_eq!("1990s".parse::<DecadeFilter>().unwrap(), DecadeFilter::Decade(1990));
        assert_eq!("ALL".parse::<DecadeFilter>().unwrap(), DecadeFilter::All);
        assert!("nineties".parse::<DecadeFilter>().is_err());
    }

    #[test]
    fn no_filter_keeps_everything_in_order() {
        bolero::check!()
            .with_type::<Vec<(DisasterKind, u8)>>()
            .cloned()
            .for_each(|shape| {
                let ds = gen_disasters(&shape);
                let all = Filter::all().apply(&ds);
                assert_eq!(all.len(), ds.len());
                assert!(all.iter().zip(ds.iter()).all(|(a, b)| a.id == b.id));
            });
    }

    #[test]
    fn decade_filter_bounds() {
        bolero::check!()
            .with_type::<(Vec<(DisasterKind, u8)>, u8)>()
            .cloned()
            .for_each(|(shape, decade)| {
                let ds = gen_disasters(&shape);
                let start = 1900 + i32::from(decade);
                let f = Filter {
                    kind: KindFilter::All,
                    decade: DecadeFilter::Decade(start),
                };
                let kept = f.apply(&ds);
                for d in &kept {
                    assert!(start <= d.year() && d.year() < start + 10);
                }
                let expected = ds
                    .iter()
                    .filter(|d| start <= d.year() && d.year() < start + 10)
                    .count();
                assert_eq!(kept.len(), expected);
            });
    }

    #[test]
    fn decades_strictly_descending() {
        bolero::check!()
            .with_type::<Vec<(DisasterKind, u8)>>()
            .cloned()
            .for_each(|shape| {
                let ds = gen_disasters(&shape);
                let decades = available_decades(&ds);
                for (a, b) in decades.iter().zip(decades.iter().skip(1)) {
                    assert!(a > b);
                }
                for d in &ds {
                    assert!(decades.contains(&d.decade()));
                }
            });
    }
}
