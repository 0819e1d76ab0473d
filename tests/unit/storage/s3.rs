use super::*;

fn keys(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("decks/1/c{i}.png")).collect()
}

#[test]
fn deletes_are_split_into_request_sized_batches() {
    let batches = delete_batches(&keys(2500)).unwrap();
    let sizes: Vec<_> = batches.iter().map(|d| d.objects().len()).collect();
    assert_eq!(sizes, [1000, 1000, 500]);
    assert_eq!(batches[2].objects()[499].key(), "decks/1/c2499.png");
    assert_eq!(batches[0].quiet(), Some(true));
}

#[test]
fn no_keys_means_no_requests() {
    assert!(delete_batches(&[]).unwrap().is_empty());
    assert_eq!(delete_batches(&keys(1000)).unwrap().len(), 1);
}
