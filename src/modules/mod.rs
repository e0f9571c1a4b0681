pub mod forensics;
