use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Appends the `created_at`/`updated_at` pair every table carries
fn with_timestamps<T: Iden + 'static>(
    table: &mut TableCreateStatement,
    created_at: T,
    updated_at: T,
) -> TableCreateStatement {
    table
        .col(
            ColumnDef::new(created_at)
                .timestamp()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(updated_at)
                .timestamp()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(with_timestamps(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::ExternalId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string())
                    .col(ColumnDef::new(Users::Name).string())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string_len(16)
                            .not_null()
                            .default("STUDENT"),
                    ),
                Users::CreatedAt,
                Users::UpdatedAt,
            ))
            .await?;

        // Create rooms table
        manager
            .create_table(with_timestamps(
                Table::create()
                    .table(Rooms::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Rooms::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Rooms::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Rooms::Capacity).integer().not_null())
                    .col(
                        ColumnDef::new(Rooms::RoomType)
                            .string_len(16)
                            .not_null()
                            .default("CLASSROOM"),
                    )
                    .col(ColumnDef::new(Rooms::Building).string())
                    .col(ColumnDef::new(Rooms::Floor).integer())
                    .col(
                        ColumnDef::new(Rooms::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    ),
                Rooms::CreatedAt,
                Rooms::UpdatedAt,
            ))
            .await?;

        // Create subjects table
        manager
            .create_table(with_timestamps(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Subjects::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Subjects::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Subjects::Name).string().not_null())
                    .col(
                        ColumnDef::new(Subjects::Credits)
                            .integer()
                            .not_null()
                            .default(3),
                    )
                    .col(
                        ColumnDef::new(Subjects::SubjectType)
                            .string_len(16)
                            .not_null()
                            .default("THEORY"),
                    ),
                Subjects::CreatedAt,
                Subjects::UpdatedAt,
            ))
            .await?;

        // Create teachers table
        manager
            .create_table(with_timestamps(
                Table::create()
                    .table(Teachers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Teachers::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Teachers::EmployeeId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Teachers::Name).string().not_null())
                    .col(
                        ColumnDef::new(Teachers::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Teachers::Phone).string())
                    .col(ColumnDef::new(Teachers::Department).string())
                    .col(ColumnDef::new(Teachers::Designation).string())
                    .col(
                        ColumnDef::new(Teachers::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Teachers::UserId).uuid())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-teachers-user_id")
                            .from(Teachers::Table, Teachers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    ),
                Teachers::CreatedAt,
                Teachers::UpdatedAt,
            ))
            .await?;

        // Create teacher_subjects junction table (many-to-many)
        manager
            .create_table(
                Table::create()
                    .table(TeacherSubjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeacherSubjects::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TeacherSubjects::TeacherId).uuid().not_null())
                    .col(ColumnDef::new(TeacherSubjects::SubjectId).uuid().not_null())
                    .col(
                        ColumnDef::new(TeacherSubjects::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-teacher_subjects-teacher_id")
                            .from(TeacherSubjects::Table, TeacherSubjects::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-teacher_subjects-subject_id")
                            .from(TeacherSubjects::Table, TeacherSubjects::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create classes table
        manager
            .create_table(with_timestamps(
                Table::create()
                    .table(Classes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Classes::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Classes::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Classes::Program).string().not_null())
                    .col(ColumnDef::new(Classes::Year).integer().not_null())
                    .col(ColumnDef::new(Classes::Division).string())
                    .col(ColumnDef::new(Classes::Semester).integer().not_null())
                    .col(
                        ColumnDef::new(Classes::Strength)
                            .integer()
                            .not_null()
                            .default(60),
                    ),
                Classes::CreatedAt,
                Classes::UpdatedAt,
            ))
            .await?;

        // Create students table
        manager
            .create_table(with_timestamps(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Students::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Students::RollNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::Name).string().not_null())
                    .col(
                        ColumnDef::new(Students::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::Phone).string())
                    .col(ColumnDef::new(Students::ClassId).uuid().not_null())
                    .col(ColumnDef::new(Students::UserId).uuid())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-students-class_id")
                            .from(Students::Table, Students::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-students-user_id")
                            .from(Students::Table, Students::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    ),
                Students::CreatedAt,
                Students::UpdatedAt,
            ))
            .await?;

        // Create time_slots table
        manager
            .create_table(with_timestamps(
                Table::create()
                    .table(TimeSlots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TimeSlots::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TimeSlots::Day).small_integer().not_null())
                    .col(ColumnDef::new(TimeSlots::Period).integer().not_null())
                    .col(ColumnDef::new(TimeSlots::StartTime).time().not_null())
                    .col(ColumnDef::new(TimeSlots::EndTime).time().not_null()),
                TimeSlots::CreatedAt,
                TimeSlots::UpdatedAt,
            ))
            .await?;

        // Create timetable_entries table
        manager
            .create_table(with_timestamps(
                Table::create()
                    .table(TimetableEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TimetableEntries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TimetableEntries::ClassId).uuid().not_null())
                    .col(ColumnDef::new(TimetableEntries::SubjectId).uuid().not_null())
                    .col(ColumnDef::new(TimetableEntries::TeacherId).uuid().not_null())
                    .col(ColumnDef::new(TimetableEntries::RoomId).uuid().not_null())
                    .col(
                        ColumnDef::new(TimetableEntries::TimeSlotId)
                            .uuid()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-timetable_entries-class_id")
                            .from(TimetableEntries::Table, TimetableEntries::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-timetable_entries-subject_id")
                            .from(TimetableEntries::Table, TimetableEntries::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-timetable_entries-teacher_id")
                            .from(TimetableEntries::Table, TimetableEntries::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-timetable_entries-room_id")
                            .from(TimetableEntries::Table, TimetableEntries::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-timetable_entries-time_slot_id")
                            .from(TimetableEntries::Table, TimetableEntries::TimeSlotId)
                            .to(TimeSlots::Table, TimeSlots::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    ),
                TimetableEntries::CreatedAt,
                TimetableEntries::UpdatedAt,
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(TimetableEntries::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TimeSlots::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Classes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TeacherSubjects::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Teachers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Rooms::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    ExternalId,
    Email,
    Name,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Rooms {
    Table,
    Id,
    Name,
    Capacity,
    RoomType,
    Building,
    Floor,
    IsAvailable,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Subjects {
    Table,
    Id,
    Code,
    Name,
    Credits,
    SubjectType,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Teachers {
    Table,
    Id,
    EmployeeId,
    Name,
    Email,
    Phone,
    Department,
    Designation,
    IsAvailable,
    UserId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TeacherSubjects {
    Table,
    Id,
    TeacherId,
    SubjectId,
    CreatedAt,
}

#[derive(Iden)]
enum Classes {
    Table,
    Id,
    Name,
    Program,
    Year,
    Division,
    Semester,
    Strength,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Students {
    Table,
    Id,
    RollNumber,
    Name,
    Email,
    Phone,
    ClassId,
    UserId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TimeSlots {
    Table,
    Id,
    Day,
    Period,
    StartTime,
    EndTime,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TimetableEntries {
    Table,
    Id,
    ClassId,
    SubjectId,
    TeacherId,
    RoomId,
    TimeSlotId,
    CreatedAt,
    UpdatedAt,
}
