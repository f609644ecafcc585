pub mod exercise;
pub mod from_row;
pub mod set;
pub mod workout;
pub mod workout_exercise;

pub use exercise::{Exercise, ExerciseRef};
pub use from_row::FromSqliteRow;
pub use set::{NewSet, Set, SetInput};
pub use workout::{parse_strict_date, start_of_day, Workout, WorkoutInput};
pub use workout_exercise::{AddExerciseInput, WorkoutExercise, WorkoutExerciseWithSets};
