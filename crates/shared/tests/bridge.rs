//! End-to-end bridge flows: records -> backend JSON -> records -> guest memory.

use xonline_domain::entities::{PresenceRecord, SessionRecord, SessionState, SlotCategory};
use xonline_domain::ids::{SessionId, SessionTag, TitleId, Xuid};
use xonline_domain::value_objects::{
    FileTime, Gamertag, PresenceState, SessionFlags, RICH_PRESENCE_INTERNAL_CAP,
    RICH_PRESENCE_WIRE_CAP,
};
use xonline_domain::wire::{FindUserInfo, WireStruct, XOnlineFriend};
use xonline_domain::{DomainError, UserResolutionRequest};
use xonline_shared::{
    BridgeError, FriendsCollection, JsonObject, PresenceCollection, SessionObject, UserResolution,
};

#[test]
fn user_lookup_round_trip_reaches_guest_layout() {
    let mut request = UserResolutionRequest::new();
    request.push_xuid(Xuid::new(1));
    let _ = request.push_gamertag("Foo");
    let mut resolution = UserResolution::new(request);

    assert_eq!(
        resolution.serialize().unwrap(),
        r#"{"UsersInfo":[["0000000000000001",""],["","Foo"]]}"#
    );

    resolution
        .deserialize(
            r#"[{"xuid":"0000000000000001","gamertag":"Bar"},
                {"xuid":"0009000000000002","gamertag":"Foo"}]"#,
        )
        .unwrap();

    let response = resolution.response();
    assert_eq!(response.gamertag_for(Xuid::new(1)).map(Gamertag::as_str), Some("Bar"));

    let image = response.to_find_users_response(0x4000_0000).to_bytes();
    assert_eq!(image.len(), 0x8 + 2 * 0x18);
    let second = FindUserInfo::read_from(&image[0x8 + 0x18..]).unwrap();
    assert_eq!(second.xuid, Xuid::new(0x0009_0000_0000_0002));
    assert_eq!(second.gamertag.as_str(), "Foo");
}

#[test]
fn single_resolved_entry() {
    let mut resolution = UserResolution::default();
    resolution
        .deserialize(r#"[{"xuid":"0000000000000001","gamertag":"Foo"}]"#)
        .unwrap();

    let entries = resolution.response().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].xuid, Some(Xuid::new(1)));
    assert_eq!(entries[0].gamertag.as_ref().map(Gamertag::as_str), Some("Foo"));
}

#[test]
fn presence_publication_document_is_exact() {
    let mut record = PresenceRecord::new(Xuid::new(1));
    let _ = record.set_rich_presence("Hello");
    let mut collection = PresenceCollection::new();
    collection.push(record);

    assert_eq!(
        collection.serialize().unwrap(),
        r#"{"presence":[{"xuid":"0000000000000001","richPresence":"Hello"}]}"#
    );
}

#[test]
fn presence_collection_never_decodes() {
    let mut collection = PresenceCollection::new();
    for text in [
        r#"{"presence":[{"xuid":"0000000000000001","richPresence":"Hello"}]}"#,
        "[]",
        "{}",
        "",
        "][",
    ] {
        assert!(matches!(
            collection.deserialize(text),
            Err(BridgeError::Unsupported(_))
        ));
    }
    assert!(collection.is_empty());
}

#[test]
fn rich_presence_caps_hold_across_the_bridge() {
    let mut friends = FriendsCollection::new();
    let long = "w".repeat(200);
    friends
        .deserialize(&format!(
            r#"[{{"xuid":"0000000000000005","gamertag":"ABCDEFGHIJKLMNOPQRSTUVWXYZ","state":1,"richPresence":"{}"}}]"#,
            long
        ))
        .unwrap();

    let friend = friends.get(Xuid::new(5)).unwrap();
    assert_eq!(friend.gamertag().as_str(), "ABCDEFGHIJKLMNO");
    assert_eq!(friend.rich_presence().len(), RICH_PRESENCE_INTERNAL_CAP);

    let images = friends.to_wire_friends();
    assert_eq!(images[0].rich_presence_len as usize, RICH_PRESENCE_WIRE_CAP);
    let bytes = images[0].to_bytes();
    assert_eq!(bytes.len(), 0xC4);
    let decoded = XOnlineFriend::read_from(&bytes).unwrap();
    assert_eq!(&decoded.gamertag[..15], b"ABCDEFGHIJKLMNO");
    assert_eq!(decoded.gamertag[15], 0);
}

#[test]
fn friends_refresh_then_clear() {
    let mut friends = FriendsCollection::new();
    friends.add(Xuid::new(1), "One");
    friends.add(Xuid::new(2), "Two");
    assert_eq!(
        friends.serialize().unwrap(),
        r#"{"xuids":["0000000000000001","0000000000000002"]}"#
    );

    friends
        .deserialize(
            r#"[{"xuid":"0000000000000002","state":3,"titleId":"4D5307E6","stateChangeTime":42}]"#,
        )
        .unwrap();
    let two = friends.get(Xuid::new(2)).unwrap();
    assert_eq!(two.gamertag().as_str(), "Two");
    assert!(two.presence().state().contains(PresenceState::PLAYING));
    assert_eq!(two.presence().title_id(), TitleId::new(0x4D53_07E6));
    assert_eq!(two.presence().state_change_time(), FileTime::from_ticks(42));

    friends.clear();
    assert!(friends.is_empty());
}

#[test]
fn session_listing_feeds_lifecycle() {
    let id = SessionId::generate(SessionTag::Online);
    let mut record = SessionRecord::new(id, SessionFlags::HOST, 4, 0);
    record.join(&[Xuid::new(1)], SlotCategory::Public).unwrap();

    let text = SessionObject::new(record).serialize().unwrap();
    let mut listed = SessionObject::default();
    listed.deserialize(&text).unwrap();

    let mut session = listed.into_record();
    assert_eq!(session.id(), id);
    assert_eq!(session.slots(SlotCategory::Public).filled(), 1);

    session.register(SessionId::generate(SessionTag::Server)).unwrap();
    session.start().unwrap();
    assert!(session.transition_to(SessionState::Lobby).is_err());
    assert_eq!(session.state(), SessionState::InGame);
}

#[test]
fn session_listing_with_bad_counts_is_a_domain_error() {
    let mut listed = SessionObject::default();
    let err = listed
        .deserialize(
            r#"{"sessionId":"AE00000000000001","privateSlotsCount":1,"openPrivateSlotsCount":1,"filledPrivateSlotsCount":1}"#,
        )
        .unwrap_err();
    assert!(matches!(err, BridgeError::Domain(DomainError::Capacity { .. })));
}

#[test]
fn malformed_documents_are_reported_not_panicked() {
    let mut resolution = UserResolution::default();
    let mut friends = FriendsCollection::new();
    let mut session = SessionObject::default();

    for text in ["", "{", "null", "{\"UsersInfo\":[]}"] {
        assert!(resolution.deserialize(text).unwrap_err().is_malformed());
        assert!(friends.deserialize(text).unwrap_err().is_malformed());
    }
    assert!(session.deserialize("[]").unwrap_err().is_malformed());
}
