// src/core/test_support.rs - In-memory sources and the sample CRUD fixtures
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{AnalysisConfig, Strategy};
use crate::error::{CallflowError, Result};
use super::{create_analyzer, CallGraphBuilder, SourceFile, SourceLocator};

pub const STRATEGIES: [Strategy; 2] = [Strategy::Heuristic, Strategy::Structural];

/// Source locator over a fixed map of qualified type name -> text
#[derive(Debug, Clone, Default)]
pub struct MemorySources {
    files: HashMap<String, String>,
    failing: HashSet<String>,
    panicking: HashSet<String>,
}

impl MemorySources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, type_name: &str, content: &str) -> Self {
        self.files.insert(type_name.to_string(), content.to_string());
        self
    }

    /// Lookups of this type fail with an I/O-style error
    pub fn failing_on(mut self, type_name: &str) -> Self {
        self.failing.insert(type_name.to_string());
        self
    }

    pub fn panicking_on(mut self, type_name: &str) -> Self {
        self.panicking.insert(type_name.to_string());
        self
    }
}

impl SourceLocator for MemorySources {
    fn source_for(&self, type_name: &str) -> Result<Option<SourceFile>> {
        if self.panicking.contains(type_name) {
            panic!("lookup of {} panicked", type_name);
        }
        if self.failing.contains(type_name) {
            return Err(CallflowError::FileSystem(format!("cannot read {}", type_name)));
        }
        Ok(self.files.get(type_name).map(|content| SourceFile {
            type_name: type_name.to_string(),
            path: PathBuf::from(format!("{}.java", type_name.replace('.', "/"))),
            content: content.clone(),
        }))
    }
}

pub fn builder(strategy: Strategy, sources: MemorySources) -> CallGraphBuilder {
    CallGraphBuilder::new(
        create_analyzer(strategy).unwrap(),
        Arc::new(sources),
        &AnalysisConfig::default(),
    )
}

pub const USER_CONTROLLER: &str = r#"package com.sbtl1.mod1.rest;

import com.sbtl1.mod1.entities.User;
import java.util.List;
import org.springframework.beans.factory.annotation.Autowired;
import org.springframework.web.bind.annotation.*;

@RestController
@RequestMapping("/users")
public class UserController {
    @Autowired
    private UserService userService;

    @GetMapping("/age/{age}")
    public List<User> getUsersByAge(@PathVariable int age) {
        return userService.getUsersByAge(age);
    }

    @PostMapping
    public User createUser(@RequestBody User user) {
        return userService.saveUser(user);
    }
}
"#;

pub const USER_SERVICE: &str = r#"package com.sbtl1.mod1.service;

import com.sbtl1.mod1.dao.UserRepository;
import com.sbtl1.mod1.entities.User;
import java.util.List;
import org.springframework.stereotype.Service;

@Service
public class UserService {
    private final UserRepository userRepository;

    public UserService(UserRepository userRepository) {
        this.userRepository = userRepository;
    }

    public List<User> getUsersByAge(int age) {
        return userRepository.findByAgeGreaterThan(age);
    }

    public User saveUser(User user) {
        validate(user);
        return userRepository.save(user);
    }

    public List<User> findByNickname(String nickname) {
        return userRepository.lookupByNickname(nickname);
    }

    private void validate(User user) {
        if (user.getName() == null) {
            throw new IllegalArgumentException("name is required");
        }
    }
}
"#;

pub const USER_REPOSITORY: &str = r#"package com.sbtl1.mod1.dao;

import com.sbtl1.mod1.entities.User;
import java.util.List;
import org.springframework.data.jpa.repository.JpaRepository;
import org.springframework.data.jpa.repository.Query;

public interface UserRepository extends JpaRepository<User, Long> {
    List<User> findByAgeGreaterThan(int age);

    @Query("SELECT u FROM User u WHERE u.nickname = ?1")
    List<User> lookupByNickname(String nickname);
}
"#;

pub const USER_ENTITY: &str = r#"package com.sbtl1.mod1.entities;

import jakarta.persistence.Entity;
import jakarta.persistence.Id;

@Entity
public class User {
    @Id
    private Long id;
    private String name;
    private int age;

    public String getName() {
        return name;
    }

    public int getAge() {
        return age;
    }
}
"#;

/// The sample user CRUD module
pub fn crud_sources() -> MemorySources {
    MemorySources::new()
        .with("com.sbtl1.mod1.rest.UserController", USER_CONTROLLER)
        .with("com.sbtl1.mod1.service.UserService", USER_SERVICE)
        .with("com.sbtl1.mod1.dao.UserRepository", USER_REPOSITORY)
        .with("com.sbtl1.mod1.entities.User", USER_ENTITY)
}
