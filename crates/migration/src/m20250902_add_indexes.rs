use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Unique indexes that make double-booking impossible at the storage level.
/// Each pairs one scheduling dimension with the time slot.
const SCHEDULING_INDEXES: [(&str, TimetableEntries); 3] = [
    (
        "uq_timetable_entries_class_time_slot",
        TimetableEntries::ClassId,
    ),
    (
        "uq_timetable_entries_teacher_time_slot",
        TimetableEntries::TeacherId,
    ),
    (
        "uq_timetable_entries_room_time_slot",
        TimetableEntries::RoomId,
    ),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, column) in SCHEDULING_INDEXES {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(TimetableEntries::Table)
                        .col(column)
                        .col(TimetableEntries::TimeSlotId)
                        .unique()
                        .to_owned(),
                )
                .await?;
        }

        // Index on timetable_entries.time_slot_id for slot lookups and delete checks
        manager
            .create_index(
                Index::create()
                    .name("idx_timetable_entries_time_slot_id")
                    .table(TimetableEntries::Table)
                    .col(TimetableEntries::TimeSlotId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_timetable_entries_subject_id")
                    .table(TimetableEntries::Table)
                    .col(TimetableEntries::SubjectId)
                    .to_owned(),
            )
            .await?;

        // A time slot is identified both by its period and by its bounds
        manager
            .create_index(
                Index::create()
                    .name("uq_time_slots_day_period")
                    .table(TimeSlots::Table)
                    .col(TimeSlots::Day)
                    .col(TimeSlots::Period)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_time_slots_day_start_end")
                    .table(TimeSlots::Table)
                    .col(TimeSlots::Day)
                    .col(TimeSlots::StartTime)
                    .col(TimeSlots::EndTime)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_teacher_subjects_teacher_subject")
                    .table(TeacherSubjects::Table)
                    .col(TeacherSubjects::TeacherId)
                    .col(TeacherSubjects::SubjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_students_class_id")
                    .table(Students::Table)
                    .col(Students::ClassId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let names = [
            "idx_students_class_id",
            "uq_teacher_subjects_teacher_subject",
            "uq_time_slots_day_start_end",
            "uq_time_slots_day_period",
            "idx_timetable_entries_subject_id",
            "idx_timetable_entries_time_slot_id",
            "uq_timetable_entries_room_time_slot",
            "uq_timetable_entries_teacher_time_slot",
            "uq_timetable_entries_class_time_slot",
        ];

        for name in names {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(Iden, Clone, Copy)]
enum TimetableEntries {
    Table,
    ClassId,
    SubjectId,
    TeacherId,
    RoomId,
    TimeSlotId,
}

#[derive(Iden)]
enum TimeSlots {
    Table,
    Day,
    Period,
    StartTime,
    EndTime,
}

#[derive(Iden)]
enum TeacherSubjects {
    Table,
    TeacherId,
    SubjectId,
}

#[derive(Iden)]
enum Students {
    Table,
    ClassId,
}
