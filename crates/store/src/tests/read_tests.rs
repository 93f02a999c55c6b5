use super::helpers::{people_store, row, trimmed};
use crate::*;
use anyhow::Result;

// --------------------- read ---------------------

#[test]
fn read_returns_padded_fields() -> Result<()> {
    let (_dir, store) = people_store();
    let slot = store.create(&row(&["ann", "nyc"]))?;
    assert_eq!(slot, 0);

    let fields = store.read(0)?.unwrap();
    assert_eq!(fields, vec!["ann     ", "nyc     "]);
    assert_eq!(trimmed(fields), vec!["ann", "nyc"]);
    Ok(())
}

#[test]
fn read_out_of_range_is_not_found() -> Result<()> {
    let (_dir, store) = people_store();
    assert!(matches!(store.read(0), Err(StoreError::NotFound(_))));

    store.create(&row(&["ann", "nyc"]))?;
    assert!(matches!(store.read(1), Err(StoreError::NotFound(_))));
    assert!(matches!(store.read(u32::MAX), Err(StoreError::NotFound(_))));
    Ok(())
}

#[test]
fn read_of_deleted_record_is_none() -> Result<()> {
    let (_dir, store) = people_store();
    store.create(&row(&["ann", "nyc"]))?;
    let cookie = store.lock(0)?;
    store.delete(0, cookie)?;
    store.unlock(0, cookie)?;

    assert_eq!(store.read(0)?, None);
    Ok(())
}

#[test]
fn values_up_to_field_width_round_trip() -> Result<()> {
    let (_dir, store) = people_store();
    for (i, name) in ["a", "abcd", "abcdefgh"].iter().enumerate() {
        let slot = store.create(&row(&[name, "x"]))?;
        assert_eq!(slot as usize, i);
        assert_eq!(store.read(slot)?.unwrap()[0].trim(), *name);
    }
    Ok(())
}

#[test]
fn long_values_are_truncated_silently() -> Result<()> {
    let (_dir, store) = people_store();
    let slot = store.create(&row(&["bartholomew", "philadelphia"]))?;
    assert_eq!(store.read(slot)?.unwrap(), vec!["bartholo", "philadel"]);
    Ok(())
}

// --------------------- find ---------------------

#[test]
fn find_prefix_in_ascending_order() -> Result<()> {
    let (_dir, store) = people_store();
    store.create(&row(&["ann", "nyc"]))?;
    store.create(&row(&["bob", "sf"]))?;
    store.create(&row(&["amy", "la"]))?;

    assert_eq!(store.find(&[Some("a"), None])?, vec![0, 2]);
    assert_eq!(store.find(&[Some("b"), None])?, vec![1]);
    assert_eq!(store.find(&[None, Some("l")])?, vec![2]);
    assert!(store.find(&[Some("z"), None])?.is_empty());
    Ok(())
}

#[test]
fn find_empty_criteria_is_wildcard() -> Result<()> {
    let (_dir, store) = people_store();
    store.create(&row(&["ann", "nyc"]))?;
    store.create(&row(&["bob", "sf"]))?;
    assert_eq!(store.find(&[Some(""), Some("")])?, vec![0, 1]);
    assert_eq!(store.find::<&str>(&[None, None])?, vec![0, 1]);
    Ok(())
}

#[test]
fn find_skips_tombstones() -> Result<()> {
    let (_dir, store) = people_store();
    store.create(&row(&["ann", "nyc"]))?;
    store.create(&row(&["amy", "la"]))?;
    let cookie = store.lock(0)?;
    store.delete(0, cookie)?;
    store.unlock(0, cookie)?;

    assert_eq!(store.find::<&str>(&[None, None])?, vec![1]);
    Ok(())
}

#[test]
fn find_with_wrong_criteria_width_matches_nothing() -> Result<()> {
    let (_dir, store) = people_store();
    store.create(&row(&["ann", "nyc"]))?;
    assert!(store.find::<&str>(&[None])?.is_empty());
    Ok(())
}

#[test]
fn find_with_exact_matcher() -> Result<()> {
    let (_dir, store) = people_store();
    store.create(&row(&["ann", "nyc"]))?;
    store.create(&row(&["anna", "la"]))?;

    assert_eq!(store.find(&[Some("ann"), None])?, vec![0, 1]);
    assert_eq!(store.find_with(&[Some("ann"), None], &ExactMatcher)?, vec![0]);
    Ok(())
}

#[test]
fn find_on_empty_store() -> Result<()> {
    let (_dir, store) = people_store();
    assert!(store.find::<&str>(&[None, None])?.is_empty());
    Ok(())
}
