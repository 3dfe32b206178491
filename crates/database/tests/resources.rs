mod common;

use common::{Fixture, class, room, setup, slot, subject, teacher};
use database::{
    entities::rooms,
    error::{ServiceError, in_use_or_db},
    services::{
        catalog::CatalogService,
        class::{ClassFilter, ClassService},
        dashboard::DashboardService,
        room::{RoomFilter, RoomService},
        student::{StudentFilter, StudentService},
        subject::{SubjectFilter, SubjectService},
        teacher::TeacherService,
        time_slot::TimeSlotService,
        timetable::TimetableService,
        user::{Identity, UserService},
    },
};
use models::{
    enums::{Day, RoomType, UserRole},
    forms::{
        NewRoom, NewStudent, NewTimeSlot, RoleChange, RoomChanges, SubjectChanges,
        TeacherChanges, TimeSlotChanges,
    },
};
use sea_orm::EntityTrait;
use uuid::Uuid;

#[tokio::test]
async fn test_duplicate_room_name() {
    let db = setup().await;
    room(&db, "C101").await;

    let err = RoomService::create(
        &db,
        NewRoom {
            name: "C101".to_string(),
            capacity: 30,
            room_type: RoomType::Lab,
            building: None,
            floor: None,
            is_available: true,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Duplicate(_)));
    assert_eq!(err.to_string(), "A room with this name already exists");

    // Renaming to its own name is not a duplicate
    let rooms = RoomService::list(&db, &RoomFilter::default()).await.unwrap();
    let updated = RoomService::update(
        &db,
        rooms[0].0.id,
        RoomChanges {
            name: Some("C101".to_string()),
            building: Some(None),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.building, None);
}

#[tokio::test]
async fn test_invalid_room_is_rejected() {
    let db = setup().await;
    let err = RoomService::create(
        &db,
        NewRoom {
            name: "C101".to_string(),
            capacity: 0,
            room_type: RoomType::Classroom,
            building: None,
            floor: None,
            is_available: true,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_room_list_filters_and_counts() {
    let db = setup().await;
    let fixture = Fixture::new(&db, "1").await;
    room(&db, "A001").await;
    TimetableService::create(&db, fixture.entry()).await.unwrap();

    let rooms = RoomService::list(&db, &RoomFilter::default()).await.unwrap();
    let names: Vec<&str> = rooms.iter().map(|(room, _)| room.name.as_str()).collect();
    assert_eq!(names, vec!["A001", "Room 1"]);
    assert_eq!(rooms[0].1, 0);
    assert_eq!(rooms[1].1, 1);

    let filter = RoomFilter {
        room_type: Some(RoomType::Lab),
        ..Default::default()
    };
    assert!(RoomService::list(&db, &filter).await.unwrap().is_empty());

    let (_, entries) = RoomService::get(&db, fixture.room.id).await.unwrap();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn test_delete_refused_while_scheduled() {
    let db = setup().await;
    let fixture = Fixture::new(&db, "1").await;
    let entry = TimetableService::create(&db, fixture.entry()).await.unwrap();

    let err = RoomService::delete(&db, fixture.room.id).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot delete room with existing timetable entries"
    );
    let err = SubjectService::delete(&db, fixture.subject.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InUse(_)));
    let err = TeacherService::delete(&db, fixture.teacher.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InUse(_)));
    let err = TimeSlotService::delete(&db, fixture.slot.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InUse(_)));
    let err = ClassService::delete(&db, fixture.class.id).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot delete class with existing timetable entries"
    );

    TimetableService::delete(&db, entry.entry.id).await.unwrap();
    RoomService::delete(&db, fixture.room.id).await.unwrap();
    let err = RoomService::get(&db, fixture.room.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound("Room")));
}

#[tokio::test]
async fn test_restricted_delete_maps_to_in_use() {
    let db = setup().await;
    let fixture = Fixture::new(&db, "1").await;
    TimetableService::create(&db, fixture.entry()).await.unwrap();

    // Skips the dependents check, as a row added after it would
    let err = rooms::Entity::delete_by_id(fixture.room.id)
        .exec(&db)
        .await
        .unwrap_err();
    let err = in_use_or_db(err, "Cannot delete room with existing timetable entries");
    assert!(matches!(err, ServiceError::InUse(_)));
    assert_eq!(
        err.to_string(),
        "Cannot delete room with existing timetable entries"
    );

    assert!(RoomService::get(&db, fixture.room.id).await.is_ok());
}

#[tokio::test]
async fn test_class_delete_checks_students_first() {
    let db = setup().await;
    let fixture = Fixture::new(&db, "1").await;
    TimetableService::create(&db, fixture.entry()).await.unwrap();
    StudentService::create(
        &db,
        NewStudent {
            roll_number: "CE001".to_string(),
            name: "Asha".to_string(),
            email: "asha@college.edu".to_string(),
            phone: None,
            class_id: fixture.class.id,
            user_id: None,
        },
    )
    .await
    .unwrap();

    let err = ClassService::delete(&db, fixture.class.id).await.unwrap_err();
    assert_eq!(err.to_string(), "Cannot delete class with enrolled students");

    let classes = ClassService::list(&db, &ClassFilter::default())
        .await
        .unwrap();
    assert_eq!(classes[0].students, 1);
    assert_eq!(classes[0].entries, 1);
}

#[tokio::test]
async fn test_student_rules() {
    let db = setup().await;
    let class = class(&db, "BTech CE 2024").await;
    let student = NewStudent {
        roll_number: "CE001".to_string(),
        name: "Asha".to_string(),
        email: "asha@college.edu".to_string(),
        phone: None,
        class_id: class.id,
        user_id: None,
    };
    StudentService::create(&db, student.clone()).await.unwrap();

    let err = StudentService::create(
        &db,
        NewStudent {
            email: "other@college.edu".to_string(),
            ..student.clone()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "A student with this roll number already exists"
    );

    let err = StudentService::create(
        &db,
        NewStudent {
            roll_number: "CE002".to_string(),
            email: "other@college.edu".to_string(),
            class_id: Uuid::new_v4(),
            ..student
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::MissingReference("Class")));

    let filter = StudentFilter {
        search: Some("asha".to_string()),
        ..Default::default()
    };
    let found = StudentService::list(&db, &filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].1.as_ref().map(|c| c.id), Some(class.id));
}

#[tokio::test]
async fn test_teacher_subjects_replaced() {
    let db = setup().await;
    let teacher = teacher(&db, "EMP001").await;
    let dbms = subject(&db, "DBMS").await;
    let os = subject(&db, "OS").await;

    TeacherService::update(
        &db,
        teacher.id,
        TeacherChanges {
            subject_ids: Some(vec![dbms.id, os.id]),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let (_, subjects, _) = TeacherService::get(&db, teacher.id).await.unwrap();
    let codes: Vec<&str> = subjects.iter().map(|s| s.code.as_str()).collect();
    assert_eq!(codes, vec!["DBMS", "OS"]);

    SubjectService::update(
        &db,
        os.id,
        SubjectChanges {
            teacher_ids: Some(vec![]),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let (_, teachers, _) = SubjectService::get(&db, os.id).await.unwrap();
    assert!(teachers.is_empty());
    let (_, subjects, _) = TeacherService::get(&db, teacher.id).await.unwrap();
    assert_eq!(subjects.len(), 1);

    // Unknown subjects leave the links untouched
    let err = TeacherService::update(
        &db,
        teacher.id,
        TeacherChanges {
            subject_ids: Some(vec![Uuid::new_v4()]),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::MissingReference("Subject")));
    let (_, subjects, _) = TeacherService::get(&db, teacher.id).await.unwrap();
    assert_eq!(subjects.len(), 1);
}

#[tokio::test]
async fn test_teacher_duplicate_email() {
    let db = setup().await;
    let first = teacher(&db, "EMP001").await;
    let second = teacher(&db, "EMP002").await;

    let err = TeacherService::update(
        &db,
        second.id,
        TeacherChanges {
            email: Some(first.email.clone()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "A teacher with this email already exists");
}

#[tokio::test]
async fn test_subject_search() {
    let db = setup().await;
    subject(&db, "DBMS").await;
    subject(&db, "CN").await;

    let filter = SubjectFilter {
        search: Some("DB".to_string()),
        ..Default::default()
    };
    let found = SubjectService::list(&db, &filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].0.code, "DBMS");

    let all = SubjectService::list(&db, &SubjectFilter::default())
        .await
        .unwrap();
    let codes: Vec<&str> = all.iter().map(|(s, _)| s.code.as_str()).collect();
    assert_eq!(codes, vec!["CN", "DBMS"]);
}

#[tokio::test]
async fn test_time_slot_uniqueness_and_ordering() {
    let db = setup().await;
    let monday = slot(&db, Day::Monday, 1).await;

    let err = TimeSlotService::create(
        &db,
        NewTimeSlot {
            day: Day::Monday,
            period: 1,
            start_time: "13:00".to_string(),
            end_time: "13:50".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "A time slot for this day and period already exists"
    );

    let err = TimeSlotService::create(
        &db,
        NewTimeSlot {
            day: Day::Monday,
            period: 2,
            start_time: "09:00".to_string(),
            end_time: "09:50".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Duplicate(_)));

    // Merged bounds must stay ordered
    let err = TimeSlotService::update(
        &db,
        monday.id,
        TimeSlotChanges {
            start_time: Some("10:00".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "Start time must be before end time");

    slot(&db, Day::Saturday, 1).await;
    slot(&db, Day::Monday, 2).await;
    let slots = TimeSlotService::list(&db, None).await.unwrap();
    let order: Vec<(Day, i32)> = slots.iter().map(|(s, _)| (s.day, s.period)).collect();
    assert_eq!(
        order,
        vec![(Day::Monday, 1), (Day::Monday, 2), (Day::Saturday, 1)]
    );
}

#[tokio::test]
async fn test_users_and_roles() {
    let db = setup().await;
    let identity = Identity {
        external_id: "sub-1".to_string(),
        email: Some("admin@college.edu".to_string()),
        name: None,
    };

    let admin = UserService::provision(&db, identity.clone()).await.unwrap();
    assert_eq!(admin.role, UserRole::Student);
    let again = UserService::provision(&db, identity).await.unwrap();
    assert_eq!(again.id, admin.id);

    let other = UserService::provision(
        &db,
        Identity {
            external_id: "sub-2".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let err = UserService::change_role(
        &db,
        &admin,
        RoleChange {
            user_id: admin.id,
            role: UserRole::Admin,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "You cannot change your own role");

    let promoted = UserService::change_role(
        &db,
        &admin,
        RoleChange {
            user_id: other.id,
            role: UserRole::Teacher,
        },
    )
    .await
    .unwrap();
    assert_eq!(promoted.role, UserRole::Teacher);

    let err = UserService::change_role(
        &db,
        &admin,
        RoleChange {
            user_id: Uuid::new_v4(),
            role: UserRole::Teacher,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound("User")));

    assert_eq!(UserService::list(&db).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_dashboard_counts() {
    let db = setup().await;
    let fixture = Fixture::new(&db, "1").await;
    TimetableService::create(&db, fixture.entry()).await.unwrap();
    room(&db, "Spare").await;

    let stats = DashboardService::stats(&db).await.unwrap();
    assert_eq!(stats.rooms, 2);
    assert_eq!(stats.teachers, 1);
    assert_eq!(stats.subjects, 1);
    assert_eq!(stats.classes, 1);
    assert_eq!(stats.students, 0);
    assert_eq!(stats.recent_classes.len(), 1);
    assert_eq!(stats.recent_classes[0].entries, 1);
}

#[tokio::test]
async fn test_scheduling_catalog() {
    let db = setup().await;
    let rao = teacher(&db, "EMP002").await;
    teacher(&db, "EMP001").await;
    let os = subject(&db, "OS").await;
    let dbms = subject(&db, "DBMS").await;
    room(&db, "C101").await;
    let lab = room(&db, "Lab 1").await;
    slot(&db, Day::Tuesday, 1).await;
    slot(&db, Day::Monday, 2).await;

    TeacherService::update(
        &db,
        rao.id,
        TeacherChanges {
            subject_ids: Some(vec![os.id, dbms.id]),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    RoomService::update(
        &db,
        lab.id,
        RoomChanges {
            is_available: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let data = CatalogService::scheduling_data(&db).await.unwrap();
    let codes: Vec<&str> = data.subjects.iter().map(|s| s.code.as_str()).collect();
    assert_eq!(codes, vec!["DBMS", "OS"]);
    let taught: Vec<(&str, Vec<String>)> = data
        .teachers
        .iter()
        .map(|(teacher, codes)| (teacher.employee_id.as_str(), codes.clone()))
        .collect();
    assert_eq!(
        taught,
        vec![
            ("EMP001", vec![]),
            ("EMP002", vec!["DBMS".to_string(), "OS".to_string()]),
        ]
    );
    assert_eq!(data.rooms.len(), 1);
    assert_eq!(data.time_slots[0].day, Day::Monday);

    // Unavailable rooms are still named in conversations
    let names = CatalogService::names(&db).await.unwrap();
    assert_eq!(names.rooms, vec!["C101", "Lab 1"]);
    assert_eq!(names.subjects.len(), 2);
}
