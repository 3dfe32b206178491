#![allow(dead_code)]

use database::{
    db::connect,
    entities::{classes, rooms, subjects, teachers, time_slots},
    services::{
        class::ClassService, room::RoomService, subject::SubjectService,
        teacher::TeacherService, time_slot::TimeSlotService,
    },
};
use migration::{Migrator, MigratorTrait};
use models::{
    enums::{Day, RoomType, SubjectType},
    forms::{NewClass, NewEntry, NewRoom, NewSubject, NewTeacher, NewTimeSlot},
};
use sea_orm::DatabaseConnection;

/// A fresh in-memory database with every migration applied
pub async fn setup() -> DatabaseConnection {
    let db = connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub async fn room(db: &DatabaseConnection, name: &str) -> rooms::Model {
    RoomService::create(
        db,
        NewRoom {
            name: name.to_string(),
            capacity: 60,
            room_type: RoomType::Classroom,
            building: Some("Main".to_string()),
            floor: Some(1),
            is_available: true,
        },
    )
    .await
    .unwrap()
}

pub async fn subject(db: &DatabaseConnection, code: &str) -> subjects::Model {
    SubjectService::create(
        db,
        NewSubject {
            code: code.to_string(),
            name: format!("{code} fundamentals"),
            credits: 3,
            subject_type: SubjectType::Theory,
        },
    )
    .await
    .unwrap()
}

pub async fn teacher(db: &DatabaseConnection, employee_id: &str) -> teachers::Model {
    TeacherService::create(
        db,
        NewTeacher {
            employee_id: employee_id.to_string(),
            name: format!("Teacher {employee_id}"),
            email: format!("{}@college.edu", employee_id.to_lowercase()),
            phone: None,
            department: Some("Computer Engineering".to_string()),
            designation: None,
            is_available: true,
            user_id: None,
        },
    )
    .await
    .unwrap()
}

pub async fn class(db: &DatabaseConnection, name: &str) -> classes::Model {
    ClassService::create(
        db,
        NewClass {
            name: name.to_string(),
            program: "BTech CE".to_string(),
            year: 2,
            division: Some("A".to_string()),
            semester: 3,
            strength: 60,
        },
    )
    .await
    .unwrap()
}

pub async fn slot(db: &DatabaseConnection, day: Day, period: i32) -> time_slots::Model {
    let start = 8 + period;
    TimeSlotService::create(
        db,
        NewTimeSlot {
            day,
            period,
            start_time: format!("{start:02}:00"),
            end_time: format!("{start:02}:50"),
        },
    )
    .await
    .unwrap()
}

/// One row of every kind an entry references
pub struct Fixture {
    pub class: classes::Model,
    pub subject: subjects::Model,
    pub teacher: teachers::Model,
    pub room: rooms::Model,
    pub slot: time_slots::Model,
}

impl Fixture {
    pub async fn new(db: &DatabaseConnection, suffix: &str) -> Self {
        Self {
            class: class(db, &format!("Class {suffix}")).await,
            subject: subject(db, &format!("SUB{suffix}")).await,
            teacher: teacher(db, &format!("EMP{suffix}")).await,
            room: room(db, &format!("Room {suffix}")).await,
            slot: slot(db, Day::Monday, 1).await,
        }
    }

    pub fn entry(&self) -> NewEntry {
        NewEntry {
            class_id: Some(self.class.id),
            subject_id: Some(self.subject.id),
            teacher_id: Some(self.teacher.id),
            room_id: Some(self.room.id),
            time_slot_id: Some(self.slot.id),
        }
    }
}
