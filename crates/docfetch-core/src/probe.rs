//! Probe planning: the ordered list of identifier combinations the resolver
//! walks, built up front so ordering and termination do not depend on I/O.

use serde::Serialize;
use std::fmt;

use crate::reference::{identifier_forms, strip_extension, DeliveryType, DocumentRef, ResourceType};

/// One direct download attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub resource_type: ResourceType,
    pub delivery_type: DeliveryType,
    pub public_id: String,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.resource_type, self.delivery_type, self.public_id
        )
    }
}

/// Full search space for one document reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbePlan {
    /// Resource type × delivery type × identifier form, most specific first.
    pub direct: Vec<Candidate>,
    /// Resource type × delivery type pairs for the prefix search phase.
    pub search: Vec<(ResourceType, DeliveryType)>,
    /// Extension-stripped public id used as the search prefix.
    pub search_prefix: String,
}

impl ProbePlan {
    pub fn for_document(doc: &DocumentRef) -> Self {
        let resource_types = guess_first(doc.resource_type, &ResourceType::ALL);
        let delivery_types = guess_first(doc.delivery_type, &DeliveryType::ALL);
        let forms = identifier_forms(&doc.public_id);

        let mut direct = Vec::with_capacity(resource_types.len() * delivery_types.len() * forms.len());
        let mut search = Vec::with_capacity(resource_types.len() * delivery_types.len());
        for &resource_type in &resource_types {
            for &delivery_type in &delivery_types {
                search.push((resource_type, delivery_type));
                for public_id in &forms {
                    direct.push(Candidate {
                        resource_type,
                        delivery_type,
                        public_id: public_id.clone(),
                    });
                }
            }
        }

        Self {
            direct,
            search,
            search_prefix: strip_extension(&doc.public_id).to_string(),
        }
    }
}

/// `guess` followed by the remaining members of `all`, in order, no repeats.
fn guess_first<T: Copy + PartialEq>(guess: T, all: &[T]) -> Vec<T> {
    let mut ordered = Vec::with_capacity(all.len());
    ordered.push(guess);
    ordered.extend(all.iter().copied().filter(|t| *t != guess));
    ordered
}
