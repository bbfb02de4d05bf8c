// Demo data shown by the client. There is no backend; every screen reads from here.

use crate::models::{
    Category, Challenge, Conversation, Coordinates, DeliveryStatus, Difficulty, Location, Message,
    MessageOrigin, Person, PresenceStatus, UserStats,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn person(
    id: &str,
    name: &str,
    country: &str,
    major: &str,
    year: &str,
    compatibility: u8,
    challenges: (u32, u32),
    last_activity: &str,
    activities: &[&str],
    status: PresenceStatus,
    interests: &[&str],
    languages: &[&str],
) -> Person {
    Person {
        id: id.to_string(),
        name: name.to_string(),
        country: country.to_string(),
        major: major.to_string(),
        year: year.to_string(),
        compatibility,
        challenges_completed: challenges.0,
        total_challenges: challenges.1,
        last_activity: last_activity.to_string(),
        activities: strings(activities),
        status,
        interests: strings(interests),
        languages: strings(languages),
    }
}

pub fn people() -> Vec<Person> {
    use PresenceStatus::*;
    vec![
        person(
            "1", "Ahmed Khan", "Pakistan", "Computer Science", "Junior", 95, (3, 5), "2 hours ago",
            &["Coffee Connection", "Study Buddy", "Mirror Lake Walk"],
            Online,
            &["Programming", "Cricket", "Photography"],
            &["English", "Urdu", "Hindi"],
        ),
        person(
            "2", "Fatima Ali", "India", "Business", "Sophomore", 92, (4, 5), "1 hour ago",
            &["Coffee Connection", "Study Buddy", "Mirror Lake Walk", "Wexner Center Visit"],
            Online,
            &["Finance", "Dancing", "Cooking"],
            &["English", "Hindi", "Gujarati"],
        ),
        person(
            "3", "Hassan Sheikh", "Bangladesh", "Engineering", "Senior", 88, (1, 2), "3 hours ago",
            &["Study Buddy"],
            Offline,
            &["Robotics", "Soccer", "Music"],
            &["English", "Bengali"],
        ),
        person(
            "4", "Priya Sharma", "India", "Finance", "Sophomore", 95, (2, 3), "30 minutes ago",
            &["Coffee Connection", "Food Truck Adventure"],
            Online,
            &["Finance", "Bollywood", "Photography"],
            &["English", "Hindi", "Punjabi"],
        ),
        person(
            "5", "Wei Chen", "China", "Engineering", "Junior", 87, (1, 2), "1 day ago",
            &["Study Buddy"],
            Offline,
            &["Machine Learning", "Badminton", "Gaming"],
            &["English", "Mandarin"],
        ),
        person(
            "6", "Maria Santos", "Brazil", "Finance", "Senior", 92, (3, 4), "2 hours ago",
            &["Coffee Connection", "Study Buddy", "Wexner Center Visit"],
            Online,
            &["Finance", "Soccer", "Dancing"],
            &["English", "Portuguese", "Spanish"],
        ),
    ]
}

fn message(id: &str, text: &str, timestamp: &str, own: bool, status: DeliveryStatus) -> Message {
    Message {
        id: id.to_string(),
        text: text.to_string(),
        timestamp: timestamp.to_string(),
        origin: if own { MessageOrigin::Own } else { MessageOrigin::Counterpart },
        delivery_status: status,
    }
}

pub fn conversations() -> Vec<Conversation> {
    use DeliveryStatus::*;
    vec![
        Conversation {
            id: "1".to_string(),
            name: "Ahmed Khan".to_string(),
            country: "Pakistan".to_string(),
            major: "Computer Science".to_string(),
            last_message: "Hey! Saw you're from Pakistan too. Want to grab coffee at Mirror Lake?".to_string(),
            last_activity: "2 hours ago".to_string(),
            unread_count: 2,
            status: PresenceStatus::Online,
            messages: vec![
                message("1", "Hey! Saw you're from Pakistan too. Want to grab coffee at Mirror Lake?", "2:30 PM", false, Read),
                message("2", "That sounds great! I'm free tomorrow afternoon", "2:32 PM", true, Read),
                message("3", "Perfect! How about 3 PM at Mirror Lake Cafe?", "2:35 PM", false, Read),
                message("4", "See you there! 🎉", "2:36 PM", true, Read),
            ],
        },
        Conversation {
            id: "2".to_string(),
            name: "Fatima Ali".to_string(),
            country: "India".to_string(),
            major: "Business".to_string(),
            last_message: "Thanks for the study session yesterday at Thompson Library!".to_string(),
            last_activity: "1 hour ago".to_string(),
            unread_count: 0,
            status: PresenceStatus::Online,
            messages: vec![
                message("1", "Thanks for the study session yesterday at Thompson Library!", "1:15 PM", false, Read),
                message("2", "You're welcome! It was really helpful. Want to meet again this week?", "1:20 PM", true, Read),
            ],
        },
        Conversation {
            id: "3".to_string(),
            name: "Hassan Sheikh".to_string(),
            country: "Bangladesh".to_string(),
            major: "Engineering".to_string(),
            last_message: "Are you going to the Pakistani Student Association meeting tonight?".to_string(),
            last_activity: "3 hours ago".to_string(),
            unread_count: 1,
            status: PresenceStatus::Offline,
            messages: vec![
                message("1", "Are you going to the Pakistani Student Association meeting tonight?", "11:30 AM", false, Delivered),
            ],
        },
        Conversation {
            id: "4".to_string(),
            name: "Priya Sharma".to_string(),
            country: "India".to_string(),
            major: "Finance".to_string(),
            last_message: "The food truck adventure was amazing! We should do it again".to_string(),
            last_activity: "1 day ago".to_string(),
            unread_count: 0,
            status: PresenceStatus::Online,
            messages: vec![
                message("1", "The food truck adventure was amazing! We should do it again", "Yesterday 4:30 PM", false, Read),
                message("2", "Absolutely! I loved the Indian food truck. Next time let's try the Mexican one", "Yesterday 4:35 PM", true, Read),
            ],
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn challenge(
    id: &str,
    title: &str,
    description: &str,
    points: u32,
    category: Category,
    location: &str,
    distance: &str,
    completed: bool,
    participants: u32,
    difficulty: Difficulty,
) -> Challenge {
    Challenge {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        points,
        category,
        location: location.to_string(),
        distance: distance.to_string(),
        completed,
        participants,
        difficulty,
    }
}

pub fn challenges() -> Vec<Challenge> {
    use Category::*;
    use Difficulty::*;
    vec![
        challenge("1", "Mirror Lake Walk", "Take a peaceful walk around Mirror Lake and enjoy the campus scenery",
            50, Campus, "Mirror Lake", "0.2 miles", true, 1247, Easy),
        challenge("2", "Coffee Connection", "Meet someone new over coffee at Mirror Lake Cafe",
            50, Social, "Mirror Lake Cafe", "0.1 miles", true, 892, Easy),
        challenge("3", "Study Buddy", "Find a study partner at Thompson Library",
            60, Academic, "Thompson Library", "0.3 miles", true, 1567, Medium),
        challenge("4", "Buckeye Spirit", "Attend a football game and show your Buckeye pride",
            100, Cultural, "Ohio Stadium", "0.4 miles", false, 2341, Hard),
        challenge("5", "Food Truck Adventure", "Try a new cuisine at the food truck court",
            75, Cultural, "Food Truck Court", "0.2 miles", false, 678, Medium),
        challenge("6", "Wexner Center Visit", "Explore art and culture at the Wexner Center",
            75, Cultural, "Wexner Center", "0.3 miles", true, 445, Medium),
        challenge("7", "Oval Stroll", "Take a walk around the historic Oval",
            40, Campus, "The Oval", "0.1 miles", false, 1890, Easy),
        challenge("8", "RPAC Workout", "Get active at the Recreation and Physical Activity Center",
            80, Physical, "RPAC", "0.4 miles", false, 1123, Medium),
    ]
}

#[allow(clippy::too_many_arguments)]
fn location(
    id: &str,
    name: &str,
    category: Category,
    distance: &str,
    activities: u32,
    active_users: u32,
    (x, y): (f64, f64),
    description: &str,
) -> Location {
    Location {
        id: id.to_string(),
        name: name.to_string(),
        category,
        distance: distance.to_string(),
        activities,
        active_users,
        coordinates: Coordinates { x, y },
        description: description.to_string(),
    }
}

/// Map coordinates live in a 500 x 350 display plane, y growing downwards.
pub fn locations() -> Vec<Location> {
    use Category::*;
    vec![
        location("1", "Mirror Lake", Campus, "0.2 miles", 3, 45, (200.0, 150.0),
            "Peaceful lake perfect for walks and reflection"),
        location("2", "Mirror Lake Cafe", Social, "0.1 miles", 2, 23, (180.0, 170.0),
            "Cozy cafe for coffee and conversations"),
        location("3", "Thompson Library", Academic, "0.3 miles", 4, 67, (300.0, 200.0),
            "Main library for study sessions and research"),
        location("4", "Ohio Stadium", Cultural, "0.4 miles", 1, 12, (400.0, 100.0),
            "Home of the Buckeyes - football games and events"),
        location("5", "Food Truck Court", Cultural, "0.2 miles", 2, 34, (250.0, 250.0),
            "Diverse food options from around the world"),
        location("6", "Wexner Center", Cultural, "0.3 miles", 3, 28, (350.0, 180.0),
            "Art and cultural center for exhibitions"),
        location("7", "The Oval", Campus, "0.1 miles", 2, 56, (150.0, 200.0),
            "Historic center of campus for events and gatherings"),
        location("8", "RPAC", Physical, "0.4 miles", 5, 89, (450.0, 300.0),
            "Recreation and Physical Activity Center"),
    ]
}

pub const MAP_WIDTH: f64 = 500.0;
pub const MAP_HEIGHT: f64 = 350.0;

pub fn user_stats() -> UserStats {
    UserStats {
        total_points: 1250,
        completed_challenges: 4,
        total_challenges: 8,
        current_streak: 3,
    }
}
