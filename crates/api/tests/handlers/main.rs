mod middleware_test;
mod test_utils;
mod timetable_test;
