//! Fixtures shared by unit tests across modules.

use crate::pronunciation::PronouncingDictionary;
use crate::repository::{LineRepository, SharedDictionary};
use std::collections::BTreeSet;
use std::sync::Arc;

pub(crate) fn test_dictionary() -> SharedDictionary {
    let dictionary = PronouncingDictionary::from_cmudict(
        "a  AH0\n\
         a(2)  EY1\n\
         the  DH AH0\n\
         to  T UW1\n\
         cat  K AE1 T\n\
         hat  HH AE1 T\n\
         sat  S AE1 T\n\
         down  D AW1 N\n\
         brown  B R AW1 N\n\
         town  T AW1 N\n\
         wind  W IH1 N D\n\
         blew  B L UW1\n\
         fast  F AE1 S T\n\
         last  L AE1 S T\n\
         boom  B UW1 M\n",
    )
    .expect("fixture dictionary parses");
    Arc::new(dictionary)
}

pub(crate) fn repository_with(lines: &[&str]) -> LineRepository {
    let mut repository =
        LineRepository::open_in_memory(test_dictionary()).expect("in-memory repository opens");
    let failed = repository
        .insert_many(lines)
        .expect("fixture lines insert");
    assert!(failed.is_empty(), "fixture lines should all be valid");
    repository
}

pub(crate) fn set(counts: &[u32]) -> BTreeSet<u32> {
    counts.iter().copied().collect()
}
