pub mod google_people;
