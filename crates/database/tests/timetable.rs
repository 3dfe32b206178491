mod common;

use common::{Fixture, class, room, setup, slot, teacher};
use chrono::Utc;
use database::{
    entities::timetable_entries,
    error::{ServiceError, conflict_or_db},
    services::{
        room::RoomService,
        teacher::TeacherService,
        timetable::{EntryFilter, TimetableService},
    },
};
use models::{
    availability::Unavailable,
    conflict::Conflict,
    enums::Day,
    forms::{EntryChanges, NewEntry, RoomChanges, TeacherChanges},
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set};
use uuid::Uuid;

#[tokio::test]
async fn test_create_entry_embeds_references() {
    let db = setup().await;
    let fixture = Fixture::new(&db, "1").await;

    let created = TimetableService::create(&db, fixture.entry()).await.unwrap();

    assert_eq!(created.class.id, fixture.class.id);
    assert_eq!(created.subject.code, "SUB1");
    assert_eq!(created.teacher.id, fixture.teacher.id);
    assert_eq!(created.room.name, "Room 1");
    assert_eq!(created.time_slot.day, Day::Monday);
}

#[tokio::test]
async fn test_missing_field_is_rejected() {
    let db = setup().await;
    let fixture = Fixture::new(&db, "1").await;

    let entry = NewEntry {
        room_id: None,
        ..fixture.entry()
    };
    let err = TimetableService::create(&db, entry).await.unwrap_err();
    assert_eq!(err.to_string(), "Room ID is required");
}

#[tokio::test]
async fn test_missing_references_reported_in_order() {
    let db = setup().await;
    let fixture = Fixture::new(&db, "1").await;

    let entry = NewEntry {
        teacher_id: Some(Uuid::new_v4()),
        room_id: Some(Uuid::new_v4()),
        ..fixture.entry()
    };
    let err = TimetableService::create(&db, entry).await.unwrap_err();
    assert!(matches!(err, ServiceError::MissingReference("Teacher")));

    let entry = NewEntry {
        time_slot_id: Some(Uuid::new_v4()),
        ..fixture.entry()
    };
    let err = TimetableService::create(&db, entry).await.unwrap_err();
    assert_eq!(err.to_string(), "Time slot not found");
}

#[tokio::test]
async fn test_each_dimension_conflicts() {
    let db = setup().await;
    let fixture = Fixture::new(&db, "1").await;
    TimetableService::create(&db, fixture.entry()).await.unwrap();

    let other_class = class(&db, "Class 2").await;
    let other_teacher = teacher(&db, "EMP2").await;
    let other_room = room(&db, "Room 2").await;

    // Same class, everything else different
    let entry = NewEntry {
        teacher_id: Some(other_teacher.id),
        room_id: Some(other_room.id),
        ..fixture.entry()
    };
    let err = TimetableService::create(&db, entry).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(Conflict::Class)));

    // Same teacher
    let entry = NewEntry {
        class_id: Some(other_class.id),
        room_id: Some(other_room.id),
        ..fixture.entry()
    };
    let err = TimetableService::create(&db, entry).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(Conflict::Teacher)));

    // Same room
    let entry = NewEntry {
        class_id: Some(other_class.id),
        teacher_id: Some(other_teacher.id),
        ..fixture.entry()
    };
    let err = TimetableService::create(&db, entry).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Room already has a scheduled entry at this time slot"
    );

    // Nothing shared
    let entry = NewEntry {
        class_id: Some(other_class.id),
        teacher_id: Some(other_teacher.id),
        room_id: Some(other_room.id),
        ..fixture.entry()
    };
    assert!(TimetableService::create(&db, entry).await.is_ok());
}

#[tokio::test]
async fn test_same_resources_in_another_slot_are_fine() {
    let db = setup().await;
    let fixture = Fixture::new(&db, "1").await;
    TimetableService::create(&db, fixture.entry()).await.unwrap();

    let tuesday = slot(&db, Day::Tuesday, 1).await;
    let entry = NewEntry {
        time_slot_id: Some(tuesday.id),
        ..fixture.entry()
    };
    assert!(TimetableService::create(&db, entry).await.is_ok());
}

#[tokio::test]
async fn test_unavailable_resources_block_new_entries_only() {
    let db = setup().await;
    let fixture = Fixture::new(&db, "1").await;
    let existing = TimetableService::create(&db, fixture.entry()).await.unwrap();

    TeacherService::update(
        &db,
        fixture.teacher.id,
        TeacherChanges {
            is_available: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    // The existing entry stays and can still move to another slot
    let tuesday = slot(&db, Day::Tuesday, 1).await;
    let moved = TimetableService::update(
        &db,
        existing.entry.id,
        EntryChanges {
            time_slot_id: Some(tuesday.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(moved.time_slot.id, tuesday.id);

    // A new entry with the teacher is refused
    let other_class = class(&db, "Class 2").await;
    let other_room = room(&db, "Room 2").await;
    let entry = NewEntry {
        class_id: Some(other_class.id),
        room_id: Some(other_room.id),
        ..fixture.entry()
    };
    let err = TimetableService::create(&db, entry).await.unwrap_err();
    assert!(matches!(err, ServiceError::Unavailable(Unavailable::Teacher)));

    // Teacher is reported before the room
    RoomService::update(
        &db,
        other_room.id,
        RoomChanges {
            is_available: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let entry = NewEntry {
        class_id: Some(other_class.id),
        room_id: Some(other_room.id),
        ..fixture.entry()
    };
    let err = TimetableService::create(&db, entry).await.unwrap_err();
    assert_eq!(err.to_string(), "Teacher is not available");
}

#[tokio::test]
async fn test_update_ignores_own_row_and_checks_others() {
    let db = setup().await;
    let fixture = Fixture::new(&db, "1").await;
    let first = TimetableService::create(&db, fixture.entry()).await.unwrap();

    // Re-saving an entry unchanged is not a conflict with itself
    let same = TimetableService::update(&db, first.entry.id, EntryChanges::default())
        .await
        .unwrap();
    assert_eq!(same.entry.id, first.entry.id);

    let other_class = class(&db, "Class 2").await;
    let other_teacher = teacher(&db, "EMP2").await;
    let other_room = room(&db, "Room 2").await;
    let tuesday = slot(&db, Day::Tuesday, 1).await;
    let second = TimetableService::create(
        &db,
        NewEntry {
            class_id: Some(other_class.id),
            subject_id: Some(fixture.subject.id),
            teacher_id: Some(other_teacher.id),
            room_id: Some(other_room.id),
            time_slot_id: Some(tuesday.id),
        },
    )
    .await
    .unwrap();

    // Moving the second entry into the first's room at Monday collides
    let err = TimetableService::update(
        &db,
        second.entry.id,
        EntryChanges {
            time_slot_id: Some(fixture.slot.id),
            room_id: Some(fixture.room.id),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(Conflict::Room)));

    let err = TimetableService::update(&db, Uuid::new_v4(), EntryChanges::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound("Timetable entry")));
}

#[tokio::test]
async fn test_list_is_in_weekly_order_and_filters() {
    let db = setup().await;
    let fixture = Fixture::new(&db, "1").await;
    let friday = slot(&db, Day::Friday, 2).await;
    let tuesday = slot(&db, Day::Tuesday, 3).await;

    for slot in [&friday, &tuesday] {
        TimetableService::create(
            &db,
            NewEntry {
                time_slot_id: Some(slot.id),
                ..fixture.entry()
            },
        )
        .await
        .unwrap();
    }
    TimetableService::create(&db, fixture.entry()).await.unwrap();

    let all = TimetableService::list(&db, &EntryFilter::default())
        .await
        .unwrap();
    let days: Vec<Day> = all.iter().map(|e| e.time_slot.day).collect();
    assert_eq!(days, vec![Day::Monday, Day::Tuesday, Day::Friday]);

    let filter = EntryFilter {
        day: Some(Day::Friday),
        class_id: Some(fixture.class.id),
        ..Default::default()
    };
    let fridays = TimetableService::list(&db, &filter).await.unwrap();
    assert_eq!(fridays.len(), 1);
    assert_eq!(fridays[0].time_slot.id, friday.id);

    let filter = EntryFilter {
        room_id: Some(Uuid::new_v4()),
        ..Default::default()
    };
    assert!(TimetableService::list(&db, &filter).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_entry() {
    let db = setup().await;
    let fixture = Fixture::new(&db, "1").await;
    let created = TimetableService::create(&db, fixture.entry()).await.unwrap();

    TimetableService::delete(&db, created.entry.id).await.unwrap();
    let err = TimetableService::get(&db, created.entry.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    // The slot is free again
    assert!(TimetableService::create(&db, fixture.entry()).await.is_ok());
}

#[tokio::test]
async fn test_unique_indexes_map_back_to_conflicts() {
    let db = setup().await;
    let fixture = Fixture::new(&db, "1").await;
    TimetableService::create(&db, fixture.entry()).await.unwrap();

    let other_class = class(&db, "Class 2").await;
    let other_teacher = teacher(&db, "EMP2").await;
    let other_room = room(&db, "Room 2").await;

    // Written straight to the table so only the indexes stand in the way
    let clashes = [
        (fixture.class.id, other_teacher.id, other_room.id, Conflict::Class),
        (other_class.id, fixture.teacher.id, other_room.id, Conflict::Teacher),
        (other_class.id, other_teacher.id, fixture.room.id, Conflict::Room),
    ];
    for (class_id, teacher_id, room_id, expected) in clashes {
        let now = Utc::now().naive_utc();
        let err = timetable_entries::ActiveModel {
            id: Set(Uuid::new_v4()),
            class_id: Set(class_id),
            subject_id: Set(fixture.subject.id),
            teacher_id: Set(teacher_id),
            room_id: Set(room_id),
            time_slot_id: Set(fixture.slot.id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&db)
        .await
        .unwrap_err();

        match conflict_or_db(err) {
            ServiceError::Conflict(conflict) => assert_eq!(conflict, expected),
            other => panic!("expected {expected:?}, got {other:?}"),
        }
    }
}
