use std::collections::BTreeMap;

use chrono::Utc;

use crate::{
    api::{Disaster, DisasterId, Error, NewDisaster, StoryLink, Target, Time},
    filter::{available_decades, Filter},
    store::keys,
    IdGen, Store, StoreExt,
};

/// Seed disasters followed by the ones users submitted
#[derive(Clone, Debug)]
pub struct DisasterDb {
    seed: Vec<Disaster>,
    submitted: Vec<Disaster>,

    /// Stories users appended to seed disasters, persisted apart from the seed
    seed_additions: BTreeMap<DisasterId, Vec<StoryLink>>,

    selected: Option<DisasterId>,
    ids: IdGen,
}

impl DisasterDb {
    pub fn new(seed: Vec<Disaster>, submitted: Vec<Disaster>) -> DisasterDb {
        let last_id = seed
            .iter()
            .chain(submitted.iter())
            .map(|d| d.id.0)
            .max()
            .unwrap_or(0);
        DisasterDb {
            seed,
            submitted,
            seed_additions: BTreeMap::new(),
            selected: None,
            ids: IdGen::after(last_id),
        }
    }

    /// Loads the submitted disasters and re-applies the stories added to `seed`
    pub fn load<S: Store + ?Sized>(store: &mut S, seed: Vec<Disaster>) -> DisasterDb {
        let submitted = store.take_valid(keys::USER_DISASTERS).unwrap_or_default();
        let seed_additions: BTreeMap<DisasterId, Vec<StoryLink>> =
            store.take_valid(keys::STORY_ADDITIONS).unwrap_or_default();
        let mut res = DisasterDb::new(seed, submitted);
        for (id, stories) in seed_additions {
            match res.seed.iter_mut().find(|d| d.id == id) {
                Some(d) => {
                    d.stories.extend(stories.iter().cloned());
                    res.seed_additions.insert(id, stories);
                }
                None => tracing::warn!(%id, "dropping stories added to an unknown seed disaster"),
            }
        }
        res
    }

    /// All disasters, seed ones first, in order
    pub fn merged_view(&self) -> Vec<&Disaster> {
        self.seed.iter().chain(self.submitted.iter()).collect()
    }

    pub fn submitted(&self) -> &[Disaster] {
        &self.submitted
    }

    pub fn get(&self, id: DisasterId) -> Option<&Disaster> {
        self.seed
            .iter()
            .chain(self.submitted.iter())
            .find(|d| d.id == id)
    }

    pub fn filtered(&self, filter: &Filter) -> Vec<&Disaster> {
        filter.apply(self.merged_view())
    }

    pub fn available_decades(&self) -> Vec<i32> {
        available_decades(self.merged_view())
    }

    pub fn submit<S: Store + ?Sized>(
        &mut self,
        store: &mut S,
        new: NewDisaster,
    ) -> Result<DisasterId, Error> {
        self.submit_at(store, new, Utc::now())
    }

    /// Form validation already happened, only the location is checked again
    pub fn submit_at<S: Store + ?Sized>(
        &mut self,
        store: &mut S,
        new: NewDisaster,
        now: Time,
    ) -> Result<DisasterId, Error> {
        if new.location.is_none() {
            return Err(Error::InvalidLocation);
        }
        let id = DisasterId(self.ids.next_at(now));
        let disaster = new.with_id(id).ok_or(Error::InvalidLocation)?;
        tracing::info!(%id, name = %disaster.name, "new disaster submitted");
        self.submitted.push(disaster);
        store.set(keys::USER_DISASTERS, &self.submitted);
        Ok(id)
    }

    pub fn add_story<S: Store + ?Sized>(
        &mut self,
        store: &mut S,
        id: DisasterId,
        story: StoryLink,
    ) -> Result<(), Error> {
        if let Some(d) = self.submitted.iter_mut().find(|d| d.id == id) {
            d.stories.push(story);
            store.set(keys::USER_DISASTERS, &self.submitted);
        } else if let Some(d) = self.seed.iter_mut().find(|d| d.id == id) {
            d.stories.push(story.clone());
            self.seed_additions.entry(id).or_default().push(story);
            store.set(keys::STORY_ADDITIONS, &self.seed_additions);
        } else {
            return Err(Error::NotFound(Target::Disaster(id)));
        }
        tracing::debug!(%id, "story added");
        Ok(())
    }

    /// Marks the disaster as the one currently displayed
    pub fn select(&mut self, id: DisasterId) -> Result<&Disaster, Error> {
        if self.get(id).is_none() {
            return Err(Error::NotFound(Target::Disaster(id)));
        }
        self.selected = Some(id);
        self.get(id).ok_or(Error::NotFound(Target::Disaster(id)))
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Always reflects the collection, there is no separate copy to keep in sync
    pub fn selected(&self) -> Option<&Disaster> {
        self.get(self.selected?)
    }
}
